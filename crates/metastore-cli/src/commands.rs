use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;

use metastore_codec::{Format, MetadataCodec};
use metastore_server::{MetastoreServer, ServerConfig};
use metastore_store::Snapshot;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Show(args) => cmd_show(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(&args)?;
    let server = MetastoreServer::with_empty_store(config);
    server.load_snapshot().context("failed to load snapshot")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(server.serve_with_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
        }
    }))?;
    Ok(())
}

fn serve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(load) = &args.load {
        config.snapshot = Some(load.clone());
    }
    Ok(config)
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let from = resolve_format(args.from, &args.input)?;
    let to = resolve_format(args.to, &args.output)?;
    let count = convert_file(&args.input, from, &args.output, to)?;
    println!(
        "{} Converted {} identifiers: {} ({}) -> {} ({})",
        "✓".green().bold(),
        count.to_string().bold(),
        args.input.display(),
        from,
        args.output.display(),
        to.to_string().cyan(),
    );
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let format = resolve_format(args.from, &args.file)?;
    let snapshot = read_snapshot(&args.file, format)?;
    print!("{}", render_snapshot(&snapshot));
    Ok(())
}

/// Explicit format if given, otherwise the one implied by `path`.
fn resolve_format(explicit: Option<Format>, path: &Path) -> anyhow::Result<Format> {
    explicit
        .or_else(|| Format::from_extension(path))
        .ok_or_else(|| {
            anyhow!(
                "cannot infer format of {}; pass --from/--to",
                path.display()
            )
        })
}

fn read_snapshot(path: &Path, format: Format) -> anyhow::Result<Snapshot> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    MetadataCodec::decode(&data, format).with_context(|| format!("decoding {}", path.display()))
}

/// Decode `input`, re-encode as `to` into `output`. Returns the number of
/// identifiers carried over.
fn convert_file(input: &Path, from: Format, output: &Path, to: Format) -> anyhow::Result<usize> {
    let snapshot = read_snapshot(input, from)?;
    let bytes = MetadataCodec::encode(&snapshot, to)?;
    std::fs::write(output, bytes).with_context(|| format!("writing {}", output.display()))?;
    Ok(snapshot.len())
}

fn render_snapshot(snapshot: &Snapshot) -> String {
    if snapshot.is_empty() {
        return "No metadata.\n".to_string();
    }
    let mut out = String::new();
    for (id, entry) in snapshot {
        out.push_str(&format!("{} ({} keys)\n", id.yellow().bold(), entry.len()));
        for (key, value) in entry {
            out.push_str(&format!("  {} = {}\n", key.cyan(), value));
        }
    }
    out
}
