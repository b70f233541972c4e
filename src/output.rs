use std::collections::HashSet;

use console::Style;

use crate::mutants::PlanOutcome;
use crate::operators::Catalog;
use crate::planner::MutationPlan;
use crate::state::{CampaignSummary, PlanResult};

pub fn print_error(msg: &str) {
    let style = Style::new().red().bold();
    eprintln!("{} {}", style.apply_to("✗"), msg);
}

pub fn print_success(msg: &str) {
    let style = Style::new().green().bold();
    println!("{} {}", style.apply_to("✓"), msg);
}

pub fn print_plan_summary(plans: &[MutationPlan], catalog: &Catalog, out: &std::path::Path) {
    print_success(&format!(
        "{} plans across {} files written to {}",
        plans.len(),
        file_count(plans),
        out.display()
    ));

    let dim = Style::new().dim();
    for (index, operator) in catalog.iter() {
        let count = plans.iter().filter(|p| p.mutator_index == index).count();
        if count > 0 {
            println!("  {} {:<28} {}", dim.apply_to("·"), operator.name, count);
        }
    }
}

pub fn print_campaign_result(summary: &CampaignSummary) {
    let secs = summary.duration_ms as f64 / 1000.0;

    if summary.inspected > 0 && summary.tested() == 0 {
        print_success(&format!(
            "{} mutants saved for inspection in {:.1}s",
            summary.inspected, secs
        ));
    } else if !summary.has_survivors() {
        let style = Style::new().green().bold();
        println!(
            "{} {} mutants, all killed ({:.1}%) in {:.1}s",
            style.apply_to("✓"),
            summary.tested(),
            summary.score() * 100.0,
            secs,
        );
    } else {
        let style = Style::new().yellow().bold();
        println!(
            "{} {} survived / {} tested ({:.1}% killed) in {:.1}s",
            style.apply_to("!"),
            summary.survived + summary.unreported,
            summary.tested(),
            summary.score() * 100.0,
            secs,
        );
    }

    let dim = Style::new().dim();
    if summary.unreported > 0 {
        println!(
            "  {} {} runs left no test report and count as survivors",
            dim.apply_to("·"),
            summary.unreported
        );
    }
    if summary.skipped > 0 {
        println!("  {} {} plans skipped", dim.apply_to("·"), summary.skipped);
    }

    if summary.has_survivors() {
        println!();
        for result in summary.survivors() {
            print_survivor(result);
        }
    }
}

fn print_survivor(result: &PlanResult) {
    let loc_style = Style::new().dim();
    let op_style = Style::new().magenta();
    let tag = match result.outcome {
        PlanOutcome::Unreported { .. } => " (no report)",
        _ => "",
    };
    println!(
        "  {}:{} {} {}{}",
        result.file,
        result.line,
        loc_style.apply_to(format!("[{}]", result.operator)),
        op_style.apply_to(first_line(&result.original)),
        tag,
    );
}

pub fn print_status(summary: &CampaignSummary) {
    println!(
        "Last run {}: {} plans, {} killed, {} survived, {} unreported, {} skipped ({:.1}% score)",
        summary.run_id,
        summary.total,
        summary.killed,
        summary.survived,
        summary.unreported,
        summary.skipped,
        summary.score() * 100.0,
    );

    if summary.has_survivors() {
        println!();
        for result in summary.survivors() {
            print_survivor(result);
        }
    }
}

pub fn print_operators(catalog: &Catalog) {
    let index_style = Style::new().cyan();
    for (index, operator) in catalog.iter() {
        println!("{:>3} {}", index_style.apply_to(index), operator.name);
    }
}

fn file_count(plans: &[MutationPlan]) -> usize {
    plans
        .iter()
        .map(|p| p.filepath.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{} …", first)
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(file: &str) -> MutationPlan {
        MutationPlan {
            filepath: file.into(),
            start: 0,
            apx_line: 1,
            mutator_index: 0,
            text: String::new(),
        }
    }

    #[test]
    fn file_count_ignores_interleaved_repeats() {
        let plans = [plan("a.js"), plan("b.js"), plan("a.js"), plan("a.js")];
        assert_eq!(file_count(&plans), 2);
    }
}
