use anyhow::Context;
use beacon_chatbot::{ChatbotConfig, ChatbotNotifier};
use beacon_core::{ActionOptions, TemplateSource, template};
use beacon_github::config::DEFAULT_API_BASE_URL;
use beacon_github::{GitHubConfig, GitHubContentFetcher};
use clap::Args;
use tracing::info;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Chat-bot provider: dingtalk or lark.
    #[arg(long, env = "INPUT_APP")]
    pub app: String,
    /// Bot webhook URL.
    #[arg(long, env = "INPUT_WEBHOOK", hide_env_values = true)]
    pub webhook: String,
    /// Signing secret configured on the bot.
    #[arg(long, env = "INPUT_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
    /// Inline JSON payload, or file://<path> to a template in the repository.
    #[arg(long, env = "INPUT_TEMPLATE")]
    pub template: String,
    /// JSON object of placeholder values for a file template.
    #[arg(long, env = "INPUT_PARAMS")]
    pub params: Option<String>,
    /// Token used to read the file template.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
    /// Branch, tag, or commit to read the file template from.
    #[arg(long, env = "INPUT_BRANCH")]
    pub branch: Option<String>,
    /// Repository holding the file template (owner/repo).
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,
    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub github_api_url: String,
    /// Timeout for each HTTP request, in seconds.
    #[arg(long, env = "BEACON_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
    /// Print the signed request instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

impl NotifyArgs {
    fn action_options(&self) -> ActionOptions {
        ActionOptions {
            app: self.app.clone(),
            webhook: self.webhook.clone(),
            secret: self.secret.clone(),
            template: self.template.clone(),
            params: self.params.clone(),
            github_token: self.github_token.clone(),
            branch: self.branch.clone(),
        }
    }

    fn github_fetcher(&self) -> anyhow::Result<GitHubContentFetcher> {
        let repository = self
            .repository
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .context("GITHUB_REPOSITORY (owner/repo) is required when template is a file URI")?;
        let config = GitHubConfig::from_repository(repository)?
            .with_api_base_url(&self.github_api_url)
            .with_timeout_secs(self.timeout_secs);
        Ok(GitHubContentFetcher::new(config)?)
    }
}

pub async fn run(args: NotifyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let validated = args.action_options().validate()?;

    let payload = match &validated.template {
        TemplateSource::Inline(text) => template::parse_inline(text)?,
        TemplateSource::File(remote) => {
            let fetcher = args.github_fetcher()?;
            template::resolve_remote(remote, &fetcher).await?
        }
    };
    let options = validated.with_payload(payload);

    let config = ChatbotConfig::default().with_timeout_secs(args.timeout_secs);
    let notifier = ChatbotNotifier::new(options, &config)?;

    if args.dry_run {
        let prepared = notifier.prepare()?;
        let request = serde_json::json!({ "url": prepared.url, "body": prepared.body });
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&request)?),
            OutputFormat::Text => println!("POST {}\n{}", prepared.url, prepared.body),
        }
        return Ok(());
    }

    let response = notifier.notify().await?;
    info!(app = %notifier.options().app, "notification sent");

    match format {
        OutputFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(&response)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{response}");
        }
    }

    Ok(())
}
