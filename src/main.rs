use clap::Parser;
use report_helper::{cli, config, error, export, report, store, workbook};
use cli::{Cli, Commands};
use config::Config;
use error::{ReportError, Result};
use report_helper_common::{ClassificationContext, ClearConfirmation};
use store::FileLedgerStore;

fn init_logger(verbose: bool) {
    let own_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .filter(Some("report_helper"), own_level)
        .filter(Some("report_helper_common"), own_level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { file, mode, save, json, no_rows } => {
            let ctx = mode.context(config.default_code);
            let bytes = workbook::read_file(&file)?;
            let result = workbook::scan_bytes(&bytes, &ctx);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("📊 report-helper - 集計\n");
                print!("{}", report::render_summary(&result, &ctx));
                if config.show_rows && !no_rows {
                    let rows = report::render_rows(&result);
                    if !rows.is_empty() {
                        println!();
                        print!("{}", rows);
                    }
                }
            }

            if save {
                let mut ledger = FileLedgerStore::open_ledger(config.ledger_path()?);
                match ledger.append(result.total, &result.model, ctx.is_feed()) {
                    Ok(entry) => eprintln!(
                        "\n✔ 保存しました: {} ({})",
                        report_helper::format::format_currency(entry.valor),
                        if entry.modelo.is_empty() { "sem modelo" } else { entry.modelo.as_str() }
                    ),
                    Err(report_helper_common::Error::DuplicateEntry { .. }) => {
                        eprintln!("\n⚠ Esse par (valor + modelo) já está salvo.");
                    }
                    Err(e) => return Err(e.into()),
                }
                if !json {
                    println!();
                    print!("{}", report::render_ledger(ledger.ledger(), &ctx));
                }
            }
        }

        Commands::Export { file, mode, output } => {
            println!("📄 report-helper - エクスポート\n");

            let ctx = mode.context(config.default_code);
            let bytes = workbook::read_file(&file)?;
            let result = workbook::scan_bytes(&bytes, &ctx);
            println!("- {}件一致 ({})", result.count, ctx);

            export::export_matches(&result, &ctx, &output)?;
            println!("✔ Excel出力: {}", output.display());
        }

        Commands::Ledger { feed, clear, yes, json } => {
            let ctx = ClassificationContext::from_selection(config.default_code, feed);
            let path = config.ledger_path()?;
            let mut ledger = FileLedgerStore::open_ledger(&path);

            if clear {
                let confirmed = yes
                    || dialoguer::Confirm::new()
                        .with_prompt("Limpar todos os valores salvos?")
                        .default(false)
                        .interact()
                        .map_err(|e| ReportError::Prompt(e.to_string()))?;

                if confirmed {
                    ledger.clear(ClearConfirmation::confirmed())?;
                    println!("✔ 保存済み合計を削除しました: {}", path.display());
                } else {
                    println!("キャンセルしました");
                }
                return Ok(());
            }

            if json {
                let value = serde_json::json!({
                    "entries": ledger.ledger().entries(),
                    "sum": ledger.ledger().sum(),
                    "estimatedCommission": ledger.ledger().estimated_commission(&ctx),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", report::render_ledger(ledger.ledger(), &ctx));
            }
        }

        Commands::Config { show, set_default_code, set_ledger_path } => {
            let mut config = config;

            if let Some(code) = set_default_code {
                config.set_default_code(code)?;
                println!("✔ デフォルトの販売者コードを設定しました: {}", code);
            }

            if let Some(path) = set_ledger_path {
                config.set_ledger_path(path)?;
                println!("✔ 保存済み合計ファイルの場所を設定しました");
            }

            if show {
                println!("設定:");
                println!("  販売者コード: {}", config.default_code);
                println!("  一致行の表示: {}", if config.show_rows { "あり" } else { "なし" });
                match config.ledger_path() {
                    Ok(path) => println!("  保存済み合計: {}", path.display()),
                    Err(e) => println!("  保存済み合計: ({})", e),
                }
            }
        }
    }

    Ok(())
}
