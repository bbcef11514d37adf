//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, TargetArgs};
use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::pagination::{Cursor, FieldPredicate, ListClient, ListLimits, ListOptions, Page};
use crate::scope::{ProviderCollection, ScopeId, ScopeShape};
use crate::types::{JsonObject, JsonValue};
use serde_json::json;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                target,
                matches,
                max_pages,
            } => self.list(target, matches, *max_pages).await,
            Commands::Page {
                scope,
                collection,
                filter,
                top,
                next_link,
            } => {
                let options = ListOptions {
                    filter: filter.clone(),
                    top: *top,
                };
                self.page(collection, scope.as_deref(), &options, next_link.as_deref())
                    .await
            }
            Commands::ParseId { id, shape } => self.parse_id(id, shape.as_deref()),
        }
    }

    /// Load the config file, then apply command-line overrides
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(api_version) = &self.cli.api_version {
            config.api_version.clone_from(api_version);
        }
        config.validate()?;
        Ok(config)
    }

    /// Context cancelled by Ctrl-C and bounded by `--timeout`
    fn call_context(&self) -> CallContext {
        let mut ctx = CallContext::new();
        if let Some(seconds) = self.cli.timeout {
            ctx = ctx.with_timeout(Duration::from_secs(seconds));
        }

        let token = ctx.cancellation_token().clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, cancelling");
                token.cancel();
            }
        });
        ctx
    }

    fn list_client(&self, collection: &str) -> Result<ListClient<JsonValue>> {
        let config = self.client_config()?;
        let client = config
            .list_client::<JsonValue>(ProviderCollection::from_spec(collection)?)?
            .with_operation(format!("{collection}.List"));
        Ok(client)
    }

    /// Fetch every page and print the matching items
    async fn list(
        &self,
        target: &TargetArgs,
        matches: &[String],
        max_pages: Option<NonZeroUsize>,
    ) -> Result<()> {
        let client = self.list_client(&target.collection)?;
        let scope = ScopeId::parse_known(&target.scope)?;
        let options = list_options(target);
        let predicate = matches
            .iter()
            .try_fold(FieldPredicate::new(), |predicate, expr| predicate.and_parse(expr))?;
        let limits = ListLimits {
            max_pages: max_pages.map(NonZeroUsize::get),
        };

        let ctx = self.call_context();
        let result = client
            .collect_with(&ctx, &scope, &options, &predicate, limits)
            .await?;

        info!(items = result.len(), "Listed {}", scope.describe());
        self.output_items(&result.items)
    }

    /// Fetch one page, either the first or the one a link points at
    ///
    /// The scope is only read for the first page.
    async fn page(
        &self,
        collection: &str,
        scope: Option<&str>,
        options: &ListOptions,
        next_link: Option<&str>,
    ) -> Result<()> {
        let client = self.list_client(collection)?;

        let page = match next_link.and_then(Cursor::new) {
            Some(cursor) => client.fetch_cursor(&self.call_context(), &cursor).await?,
            None => {
                let scope = scope
                    .ok_or_else(|| Error::config("--scope is required without --next-link"))?;
                let scope = ScopeId::parse_known(scope)?;
                client
                    .fetch_first_page(&self.call_context(), &scope, options)
                    .await?
            }
        };

        self.output_message(&page_message(&page));
        Ok(())
    }

    /// Validate an ID against a named shape, or any known one
    fn parse_id(&self, id: &str, shape: Option<&str>) -> Result<()> {
        let scope = match shape {
            Some(slug) => {
                let shape = ScopeShape::by_slug(slug)
                    .ok_or_else(|| Error::config(format!("unknown shape '{slug}'")))?;
                ScopeId::parse(id, shape)?
            }
            None => ScopeId::parse_known(id)?,
        };

        self.output_message(&JsonValue::Object(scope_report(&scope)));
        Ok(())
    }

    fn output_items(&self, items: &[JsonValue]) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                for item in items {
                    println!("{}", serde_json::to_string(item)?);
                }
            }
            OutputFormat::Pretty => println!("{}", serde_json::to_string_pretty(items)?),
        }
        Ok(())
    }

    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn list_options(target: &TargetArgs) -> ListOptions {
    ListOptions {
        filter: target.filter.clone(),
        top: target.top,
    }
}

fn page_message(page: &Page<JsonValue>) -> JsonValue {
    json!({
        "items": page.items,
        "nextLink": page.next_link,
    })
}

/// Segments of a parsed ID as a JSON object
fn scope_report(scope: &ScopeId) -> JsonObject {
    let mut report = JsonObject::new();
    report.insert("id".into(), json!(scope.id()));
    report.insert("shape".into(), json!(scope.shape().slug));
    report.insert("description".into(), json!(scope.describe()));
    report.insert("subscriptionId".into(), json!(scope.subscription_id()));
    if let Some(group) = scope.resource_group_name() {
        report.insert("resourceGroup".into(), json!(group));
    }
    if let Some(namespace) = scope.shape().provider {
        report.insert("provider".into(), json!(namespace));
    }
    for spec in scope.shape().segments {
        if let Some(name) = scope.segment(spec.key) {
            report.insert(spec.key.into(), json!(name));
        }
    }
    report
}
