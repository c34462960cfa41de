use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use ahtml_html::print::DOCTYPE;
use acomponents::{settings::init_from_env,
                  todo_example::{render_app, ExampleApp},
                  value::Value};

#[derive(clap::Parser, Debug)]
/// Render the todo list example application to stdout.
struct Args {
    /// The id of the authenticated user (users 1 and 2 have todos)
    #[clap(long, default_value = "1")]
    user_id: i64,

    /// "thing" (the type is forced to "thing") or "sourced" (the
    /// type can be given via --props)
    #[clap(long, default_value = "thing")]
    app: ExampleApp,

    /// Extra props for the application component, as a JSON object
    #[clap(long)]
    props: Option<String>,

    /// Prefix the output with the doctype declaration
    #[clap(long)]
    doctype: bool,
}

fn main() -> Result<()> {
    init_from_env()?;
    let args = Args::parse();

    let props: Vec<(String, Value)> = match &args.props {
        Some(json) => serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(json)
            .with_context(|| format!("--props: expecting a JSON object, got {json:?}"))?
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect(),
        None => Vec::new()
    };

    let html = render_app(args.app, args.user_id, props)?;
    let mut outp = std::io::stdout().lock();
    if args.doctype {
        outp.write_all(DOCTYPE.as_bytes())?;
    }
    outp.write_all(html.as_bytes())?;
    writeln!(&mut outp)?;
    Ok(())
}
