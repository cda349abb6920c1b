use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tracing::warn;

use lumen_script::compile;
use lumen_wire::ProtocolVersion;

use crate::cmd::CompileArgs;
use crate::exit::{io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex_string, print_raw, OutputFormat};

#[derive(Serialize)]
struct CompileOutput {
    table: String,
    size: usize,
    payload_hex: String,
    diagnostics: Vec<String>,
}

pub fn run(args: CompileArgs, format: OutputFormat) -> CliResult<i32> {
    let script = std::fs::read_to_string(&args.file)
        .map_err(|err| io_error(&format!("reading {}", args.file.display()), err))?;

    let version: ProtocolVersion = args.table.into();
    let compiled = compile(&script, version);

    for diagnostic in &compiled.diagnostics {
        warn!(%diagnostic, "token dropped");
    }

    if let Some(out) = &args.out {
        std::fs::write(out, &compiled.bytes)
            .map_err(|err| io_error(&format!("writing {}", out.display()), err))?;
    }

    match format {
        OutputFormat::Raw => print_raw(&compiled.bytes),
        OutputFormat::Json => {
            let out = CompileOutput {
                table: version.to_string(),
                size: compiled.bytes.len(),
                payload_hex: hex_string(&compiled.bytes),
                diagnostics: compiled
                    .diagnostics
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TABLE", "SIZE", "DROPPED", "PAYLOAD"])
                .add_row(vec![
                    version.to_string(),
                    compiled.bytes.len().to_string(),
                    compiled.diagnostics.len().to_string(),
                    hex_string(&compiled.bytes),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "kind={} table={} size={} dropped={} payload={}",
                lumen_wire::flag_name(compiled.bytes[0]),
                version,
                compiled.bytes.len(),
                compiled.diagnostics.len(),
                hex_string(&compiled.bytes)
            );
        }
    }

    if args.strict && !compiled.is_clean() {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}
