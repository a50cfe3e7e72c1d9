use crate::modules::files::FileChange;
use crate::runtime::RunReport;

/// Print a run report in human-readable format
pub fn print_run_report(report: &RunReport) {
    println!("{}", render_run_report(report));
}

pub fn render_run_report(report: &RunReport) -> String {
    let file = &report.file;
    let mut lines = Vec::new();

    let status = if file.check_mode {
        if file.changes.is_empty() {
            "✅ Up to date (why-run)"
        } else {
            "🔍 Would update (why-run)"
        }
    } else if file.changed {
        "✅ Updated"
    } else {
        "✅ Up to date"
    };

    lines.push(format!(
        "📋 Run {} on {}: recipe[{}]",
        report.run_id, report.node, report.recipe
    ));
    lines.push(format!("{} {}", status, file.path.display()));
    lines.push(format!(
        "  • owner {}:{} mode {} sha256 {}",
        file.owner, file.group, file.mode, file.checksum
    ));
    for change in &file.changes {
        lines.push(format!("  • {}", describe_change(change)));
    }
    lines.push(format!("⏱️  Completed in {:?}", report.duration));

    lines.join("\n")
}

fn describe_change(change: &FileChange) -> String {
    match change {
        FileChange::Created => "create new file".to_string(),
        FileChange::Content { before, after } => {
            format!("update content from {} to {}", short(before), short(after))
        }
        FileChange::Mode { before, after } => format!("change mode from {before} to {after}"),
        FileChange::Owner { before, after } => format!("change owner from {before} to {after}"),
        FileChange::Group { before, after } => format!("change group from {before} to {after}"),
    }
}

fn short(checksum: &str) -> &str {
    checksum.get(..12).unwrap_or(checksum)
}
