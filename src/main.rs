use astro_catalog::{cli, collection, config, error, logging, render};
use astro_catalog_common::{distinct_categories, Attachment, Criteria, FieldValue, FormDraft, ResourceKind};
use clap::Parser;
use cli::{Cli, Commands};
use collection::RemoteCollection;
use config::Config;
use dialoguer::Confirm;
use error::{CatalogError, Result};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "astro_catalog=debug,info" } else { "warn" };
    if let Err(e) = logging::init_tracing(filter) {
        eprintln!("{}", e);
    }

    let config = Config::load()?;

    match cli.command {
        Commands::List {
            resource,
            category,
            location,
            search,
            status,
            price,
            sort,
            all,
            page,
            per_page,
            json,
        } => {
            let collection = RemoteCollection::from_config(resource, &config)?;
            load_with_spinner(&collection, json).await?;

            let criteria = Criteria {
                category,
                location,
                search,
                status,
                price_range: price,
                sort,
                active_only: !all,
            };
            let per_page = per_page.unwrap_or(config.per_page);
            let page = collection.page(&criteria, page, per_page);

            if json {
                println!("{}", serde_json::to_string_pretty(&page.items)?);
            } else if page.total == 0 {
                println!("該当する項目はありません");
                let categories = distinct_categories(&collection.snapshot().items);
                if !categories.is_empty() {
                    println!("カテゴリ: {}", categories.join(", "));
                }
            } else {
                for line in render::format_page(&page) {
                    println!("{}", line);
                }
            }
        }

        Commands::Create { resource, fields, lists, files } => {
            let draft = build_draft(fields, lists, files)?;
            let collection = RemoteCollection::from_config(resource, &config)?;

            println!("📤 {} を作成中...", resource);
            let item = collection.create(&draft).await?;
            println!("✔ 作成しました: {} ({})", item.display_name(), item.id().unwrap_or("-"));
        }

        Commands::Update { resource, id, fields, lists, files } => {
            let draft = build_draft(fields, lists, files)?;
            let collection = RemoteCollection::from_config(resource, &config)?;

            println!("📤 {} {} を更新中...", resource, id);
            let item = collection.update(&id, &draft).await?;
            println!("✔ 更新しました: {} ({})", item.display_name(), item.id().unwrap_or("-"));
        }

        Commands::Delete { resource, id, yes } => {
            if !yes && !confirm_delete(resource, &id)? {
                println!("キャンセルしました");
                return Ok(());
            }

            let collection = RemoteCollection::from_config(resource, &config)?;
            collection.remove(&id).await?;
            println!("✔ 削除しました: {} {}", resource, id);
        }

        Commands::Lookup { kind } => {
            let collection = RemoteCollection::from_config(ResourceKind::Rudraksha, &config)?;
            let values = collection.lookup(kind).await?;
            if values.is_empty() {
                println!("項目がありません");
            }
            for value in values {
                println!("  {}", value);
            }
        }

        Commands::Config { set_base_url, set_token, show } => {
            let mut config = config;
            let changed = set_base_url.is_some() || set_token.is_some();

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ 接続先を設定しました");
            }
            if let Some(token) = set_token {
                config.set_api_token(token);
                println!("✔ トークンを設定しました");
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  接続先: {}", config.base_url());
                println!("  トークン: {}", if config.api_token().is_some() { "設定済み" } else { "未設定" });
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  1ページの件数: {}", config.per_page);
                for (kind, paths) in &config.endpoints {
                    println!("  {} の一覧: {}", kind, paths.join(", "));
                }
            }
        }
    }

    Ok(())
}

async fn load_with_spinner(collection: &RemoteCollection<astro_catalog::client::HttpBackend>, quiet: bool) -> Result<()> {
    let spinner = if quiet { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("{} を取得中...", collection.kind()));

    let result = collection.refresh().await;
    spinner.finish_and_clear();
    result.map(|_| ())
}

fn build_draft(
    fields: Vec<(String, FieldValue)>,
    lists: Vec<(String, FieldValue)>,
    files: Vec<(String, PathBuf)>,
) -> Result<FormDraft> {
    let mut draft = FormDraft::new();
    for (name, value) in fields.into_iter().chain(lists) {
        draft.set(&name, value);
    }
    for (field, path) in files {
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.display().to_string()));
        }
        draft = draft.attach(Attachment::from_path(&field, &path)?);
    }
    Ok(draft)
}

fn confirm_delete(resource: ResourceKind, id: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("{} {} を削除しますか？", resource, id))
        .default(false)
        .interact()
        .map_err(|e| CatalogError::Io(std::io::Error::other(e.to_string())))
}
