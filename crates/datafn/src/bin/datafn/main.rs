mod cli;

use datafn::context::RenderContext;
use datafn::datasource::http::{HttpConnector, SecretManagerConfig};
use datafn::datasource::secret_manager::SecretManagerResolver;
use datafn::datasource::Resolver;
use datafn::funcs::{create_coll_funcs, NAMESPACE};
use datafn::value::Value;
use std::sync::Arc;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("DATAFN_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Apply(apply_cli) => apply(apply_cli),
        cli::Command::Resolve(resolve_cli) => resolve(resolve_cli),
        cli::Command::Functions => functions(),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn apply(cli: cli::ApplyCommand) -> anyhow::Result<()> {
    let subject = load(cli.input.as_deref())?;
    let params: Vec<Value> = cli.params.iter().map(|param| parse_param(param)).collect();

    let name = if cli.function.contains('.') {
        cli.function.clone()
    } else {
        format!("{NAMESPACE}.{}", cli.function)
    };

    let funcs = create_coll_funcs(Arc::new(RenderContext::background("apply")));
    anyhow::ensure!(
        funcs.contains(&name),
        "Unknown function {name}, see `datafn functions`"
    );

    let value = funcs.apply(&name, datafn::coll::Args::new(&params, &subject))?;

    output(&cli.output, &value)?;
    Ok(())
}

fn load(input: Option<&std::path::Path>) -> anyhow::Result<Value> {
    let source = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    parse_document(&source)
}

/// YAML (or JSON) document, scalar keys keep their kind
fn parse_document(source: &str) -> anyhow::Result<Value> {
    Ok(serde_yaml::from_str(source)?)
}

/// JSON if it parses, a plain string otherwise
fn parse_param(param: &str) -> Value {
    serde_json::from_str::<Value>(param).unwrap_or_else(|_| Value::from(param))
}

pub fn resolve(cli: cli::ResolveCommand) -> anyhow::Result<()> {
    let config = SecretManagerConfig {
        endpoint: cli.backend.endpoint.clone(),
        access_token: cli.backend.access_token.clone(),
        timeout: cli.backend.timeout(),
        ..Default::default()
    };
    let resolver = SecretManagerResolver::new(HttpConnector::new(config));
    let args: Vec<String> = cli.path.into_iter().collect();

    let runtime = tokio::runtime::Runtime::new()?;
    let value = runtime.block_on(async {
        let (ctx, handle) = RenderContext::new("resolve");

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
        });

        resolver.resolve(&ctx, &cli.url, &args).await
    })?;

    output(&cli.output, &value)?;
    Ok(())
}

pub fn functions() -> anyhow::Result<()> {
    let funcs = create_coll_funcs(Arc::new(RenderContext::background("functions")));
    for name in funcs.names() {
        println!("{name}");
    }

    Ok(())
}

fn output(output: &cli::OutputArgs, value: &Value) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn integer_keys_reach_pick() {
        let subject = parse_document("1: one\n'1': string one\nname: api\n").unwrap();
        let params = vec![parse_param("1")];

        let funcs = create_coll_funcs(Arc::new(RenderContext::background("test")));
        let picked = funcs
            .apply("coll.pick", datafn::coll::Args::new(&params, &subject))
            .unwrap();

        assert_eq!(picked.to_string(), r#"{"1":"one"}"#);
    }

    #[test]
    fn document_order_is_kept() {
        let subject = parse_document("zeta: 1\nalpha: 2\n").unwrap();
        assert_eq!(subject.to_string(), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn params_fall_back_to_strings() {
        assert_eq!(parse_param("3"), Value::Integer(3));
        assert_eq!(parse_param("password"), Value::from("password"));
        assert_eq!(parse_param(r#""7""#), Value::from("7"));
    }
}
