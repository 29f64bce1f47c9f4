use std::{env, process};

use graphiso::{client::CommandLineConfig, harness::run_trials};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let summary = match run_trials(&config.harness) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("trials failed: {err}");
            process::exit(2);
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("cannot encode summary: {err}");
                process::exit(2);
            }
        }
    } else {
        let spec = config.harness.spec;
        println!(
            "graphiso trials\n===============\nvertices={} edges={} adjacency={}",
            spec.vertex_count, spec.edge_count, config.harness.adjacency
        );
        for report in &summary.reports {
            println!(
                "{:<6}{:<24}steps={:<10}backtracks={:<10}{}us",
                report.trial,
                report.outcome,
                report.stats.steps,
                report.stats.backtracks,
                report.elapsed_micros
            );
        }
        println!(
            "\nSummary\n=======\nverified={} aborted={} failed={}",
            summary.verified, summary.aborted, summary.failures
        );
    }

    if !summary.all_passed() {
        process::exit(1);
    }
}
