use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use lumen_script::{tokenize, PatternTable};

use crate::cmd::TokensArgs;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct TokenOutput {
    kind: &'static str,
    lexeme: String,
}

pub fn run(args: TokensArgs, format: OutputFormat) -> CliResult<i32> {
    let script = std::fs::read_to_string(&args.file)
        .map_err(|err| io_error(&format!("reading {}", args.file.display()), err))?;

    let tokens = tokenize(&script, PatternTable::standard());

    match format {
        OutputFormat::Json => {
            let out: Vec<TokenOutput> = tokens
                .iter()
                .map(|t| TokenOutput {
                    kind: t.kind.name(),
                    lexeme: t.lexeme.clone(),
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
                .set_header(vec!["KIND", "LEXEME"]);
            for token in &tokens {
                table.add_row(vec![token.kind.name().to_string(), format!("{:?}", token.lexeme)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for token in &tokens {
                println!("{} {:?}", token.kind, token.lexeme);
            }
        }
    }

    Ok(SUCCESS)
}
