// Copyright 2026 Sage Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;

use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use sage::SearchClient;
use sage::SearchParameters;
use sage::SearchSession;
use sage::cli::Cli;
use sage::cli::Commands;
use sage::cli::FindArgs;
use sage::cli::PageArgs;
use sage::cli::SearchArgs;
use sage::config;
use sage::config::Config;
use sage::config::ConfigCtx;
use sage::output;
use sage::output::JsonResponse;
use sage::output::print_json;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SAGE_LOG";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = ConfigCtx::load(cli.server.clone(), cli.timeout)?;
    match cli.command {
        Commands::Init { force } => cmd_init(&ctx, force),
        Commands::Search(args) => {
            let json = args.page.json;
            handle_result(block_on(cmd_search(&ctx.config, args)), json)
        }
        Commands::Find(args) => {
            let json = args.page.json;
            handle_result(block_on(cmd_find(&ctx.config, args)), json)
        }
        Commands::Upload(args) => handle_result(
            block_on(cmd_upload(&ctx.config, &args.path, args.json)),
            args.json,
        ),
        Commands::Stats { json } => handle_result(block_on(cmd_stats(&ctx.config, json)), json),
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(fut: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(fut)
}

fn handle_result(result: Result<()>, json: bool) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            if json {
                let resp = JsonResponse::error("error", &format!("{err:#}"));
                print_json(&resp)?;
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

fn cmd_init(ctx: &ConfigCtx, force: bool) -> Result<()> {
    let path = ctx
        .path
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no config directory available"))?;
    if path.exists() && !force {
        anyhow::bail!(
            "sage.toml already exists at {}; pass --force to replace it",
            path.display()
        );
    }
    let config = Config {
        server_url: ctx.config.server_url.clone(),
        timeout_secs: ctx.config.timeout_secs,
        ..Config::default()
    };
    config::write_config(&path, &config)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn connect(config: &Config) -> Result<SearchClient> {
    SearchClient::new(&config.server_url, config.timeout())
        .with_context(|| format!("configure client for {}", config.server_url))
}

fn base_params(config: &Config, page: &PageArgs) -> SearchParameters {
    SearchParameters {
        skip: page.skip.unwrap_or(config.default_skip),
        limit: page
            .limit
            .map(|l| l as usize)
            .unwrap_or(config.default_limit)
            .max(1),
        sort: config.sort_order(),
        ..SearchParameters::default()
    }
}

async fn cmd_search(config: &Config, args: SearchArgs) -> Result<()> {
    let client = connect(config)?;
    let session = SearchSession::new();
    let params = SearchParameters {
        query: args.query,
        ..base_params(config, &args.page)
    };
    let request = params.simple_submission();
    client.submit(&session, Ok(request.clone())).await;

    let projection = session.snapshot().await;
    if args.page.json {
        let resp = JsonResponse::ok()
            .with_query(Some(&request))
            .with_projection(&projection, args.page.normalized);
        print_json(&resp)?;
    } else {
        print!(
            "{}",
            output::render_table(&projection, args.page.normalized, config.max_cell_width)
        );
    }
    Ok(())
}

async fn cmd_find(config: &Config, args: FindArgs) -> Result<()> {
    let client = connect(config)?;
    let session = SearchSession::new();
    let filter = if let Some(path) = args.filter.strip_prefix('@') {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read filter file {path}"))?
    } else {
        args.filter
    };
    let mut params = SearchParameters {
        custom_filter: filter,
        ..base_params(config, &args.page)
    };
    if let Some(sort) = args.sort {
        params.sort = sort;
    }

    let request = params.structured_submission();
    let mut warnings = Vec::new();
    if let Err(err) = &request {
        warnings.push(err.to_string());
    }
    let described = request.as_ref().ok().cloned();
    client.submit(&session, request).await;

    let projection = session.snapshot().await;
    if args.page.json {
        let resp = JsonResponse::ok()
            .with_query(described.as_ref())
            .with_projection(&projection, args.page.normalized)
            .with_warnings(warnings);
        print_json(&resp)?;
    } else {
        for warn in warnings {
            eprintln!("warning: {warn}");
        }
        print!(
            "{}",
            output::render_table(&projection, args.page.normalized, config.max_cell_width)
        );
    }
    Ok(())
}

async fn cmd_upload(config: &Config, path: &Path, json: bool) -> Result<()> {
    let client = connect(config)?;
    let outcome = client.upload(path).await;
    if json {
        print_json(&JsonResponse::ok().with_upload(outcome))?;
    } else {
        print!("{}", output::render_upload(&outcome));
    }
    Ok(())
}

async fn cmd_stats(config: &Config, json: bool) -> Result<()> {
    let client = connect(config)?;
    let index = client
        .stats()
        .await
        .with_context(|| format!("fetch stats from {}", client.endpoint()))?;
    if json {
        print_json(&JsonResponse::ok().with_index(index))?;
    } else {
        println!("Indexed documents: {}", index.total);
    }
    Ok(())
}
