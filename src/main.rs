use anyhow::{anyhow, Context, Result};
use fraudscope::config::Config;
use fraudscope::data::{load_dataset, source_for};
use fraudscope::export::{write_report, ReportFormat};
use fraudscope::logging::{log, obj, v_str, Domain, Level};
use fraudscope::report::DashboardReport;

struct Args {
    location: Option<String>,
    export: Option<ReportFormat>,
}

fn parse_args() -> Result<Args> {
    let mut location = None;
    let mut export = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--export" => {
                let fmt = it.next().ok_or_else(|| anyhow!("--export needs csv or json"))?;
                export = Some(fmt.parse::<ReportFormat>().map_err(|e| anyhow!(e))?);
            }
            "-h" | "--help" => {
                println!("usage: fraudscope [PATH_OR_URL] [--export csv|json]");
                std::process::exit(0);
            }
            _ if location.is_none() => location = Some(arg),
            _ => return Err(anyhow!("unexpected argument: {}", arg)),
        }
    }
    Ok(Args { location, export })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let cfg = Config::from_env();
    let source = source_for(args.location.as_deref(), &cfg)?;
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[("source", v_str(&source.describe()))]),
    );

    let records = load_dataset(source.as_ref()).await;
    let report = DashboardReport::build(&records);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(format) = args.export {
        let path = write_report(&cfg.export_dir, format, &records)
            .with_context(|| format!("exporting {} report", format))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
