use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use lumen_script::compile;
use lumen_wire::{chunk, ProtocolVersion};

use crate::cmd::FramesArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct FrameOutput {
    session_id: u32,
    offset: u32,
    chunk_size: usize,
    wire_size: usize,
    total_len: u32,
}

pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let payload: Vec<u8> = if args.raw {
        std::fs::read(&args.file)
            .map_err(|err| io_error(&format!("reading {}", args.file.display()), err))?
    } else {
        let script = std::fs::read_to_string(&args.file)
            .map_err(|err| io_error(&format!("reading {}", args.file.display()), err))?;
        let version: ProtocolVersion = args.table.into();
        compile(&script, version).bytes.to_vec()
    };

    let frames = chunk(payload, args.mtu)
        .map_err(|err| CliError::new(DATA_INVALID, format!("chunking failed: {err}")))?;

    match format {
        OutputFormat::Json => {
            let out: Vec<FrameOutput> = frames
                .iter()
                .map(|f| FrameOutput {
                    session_id: f.session_id,
                    offset: f.offset,
                    chunk_size: f.chunk.len(),
                    wire_size: f.wire_size(),
                    total_len: f.total_len,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SESSION", "OFFSET", "CHUNK", "WIRE", "TOTAL"]);
            for frame in &frames {
                table.add_row(vec![
                    format!("{:08x}", frame.session_id),
                    frame.offset.to_string(),
                    frame.chunk.len().to_string(),
                    frame.wire_size().to_string(),
                    frame.total_len.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for frame in &frames {
                println!(
                    "session={:08x} offset={} chunk={} wire={} total={}",
                    frame.session_id,
                    frame.offset,
                    frame.chunk.len(),
                    frame.wire_size(),
                    frame.total_len
                );
            }
        }
    }

    Ok(SUCCESS)
}
