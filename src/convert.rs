use std::path::PathBuf;
use std::sync::Arc;
use tessprep::configs::ConvertConfig;
use tessprep::runtime::fetcher::source_for;
use tessprep::runtime::trace::TracingTrace;
use tokio::task::JoinSet;

type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

const USAGE: &str = "Usage: convert [--config FILE] [--out-dir DIR] <file-or-url>...";

struct Args {
    config: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    locations: Vec<String>,
}

fn parse_args(raw: Vec<String>) -> Result<Args, String> {
    let mut args = Args {
        config: None,
        out_dir: None,
        locations: Vec::new(),
    };
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config needs a file")?;
                args.config = Some(PathBuf::from(value));
            }
            "--out-dir" => {
                let value = iter.next().ok_or("--out-dir needs a directory")?;
                args.out_dir = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ => args.locations.push(arg),
        }
    }
    if args.locations.is_empty() {
        return Err("no documents given".to_string());
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), DynError> {
    tracing_subscriber::fmt::init();

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = Arc::new(match &args.config {
        Some(path) => ConvertConfig::load_from_file(path)?,
        None => ConvertConfig::load_default()?,
    });
    if let Some(dir) = &args.out_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    let client = reqwest::Client::new();
    let mut tasks = JoinSet::new();
    for (index, location) in args.locations.iter().enumerate() {
        let source = source_for(location, &client);
        let location = location.clone();
        let config = config.clone();
        tasks.spawn(async move {
            let raw = source.load(&location).await?;
            let conversion = tokio::task::spawn_blocking(move || {
                tessprep::convert(&raw, &config, &TracingTrace)
            })
            .await
            .map_err(|e| tessprep::Error::Fetch(format!("conversion of {location} aborted: {e}")))??;
            Ok::<_, tessprep::Error>((index, location, conversion))
        });
    }

    let mut results = Vec::with_capacity(args.locations.len());
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(done)) => results.push(done),
            Ok(Err(err)) => {
                failures += 1;
                tracing::error!("[Convert] {}", err);
            }
            Err(err) => {
                failures += 1;
                tracing::error!("[Convert] Task panicked or was cancelled: {}", err);
            }
        }
    }
    results.sort_by_key(|(index, _, _)| *index);

    for (_, location, conversion) in results {
        match &args.out_dir {
            Some(dir) => {
                let path = dir.join(&conversion.filename);
                tokio::fs::write(&path, &conversion.tess).await?;
                tracing::info!(
                    "[Convert] {} -> {} ({} units)",
                    location,
                    path.display(),
                    conversion.unit_count
                );
            }
            None => println!("{}", conversion.tess),
        }
    }

    if failures > 0 {
        eprintln!("{failures} of {} documents failed", args.locations.len());
        std::process::exit(1);
    }
    Ok(())
}
