use crate::domain::model::AnalysisResult;
use crate::utils::error::Result;
use std::fmt::{self, Write};

/// Chat-style markdown summary of one analysis.
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_markdown(&mut out, result);
    out
}

fn write_markdown(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    let top = (100.0 - result.percentile_estimate).max(0.1);

    writeln!(out, "## 🏊 Swim Performance Analysis")?;
    writeln!(out)?;
    writeln!(out, "### 📊 Performance Summary")?;
    writeln!(
        out,
        "- Time: {} ({} {}, {} {})",
        result.time, result.event, result.course, result.gender, result.age_group
    )?;
    writeln!(
        out,
        "- Percentile Ranking: {:.1}% (Top {:.1}% nationally)",
        result.percentile_estimate, top
    )?;
    writeln!(out, "- USA Swimming Standard: {}", result.matched_level)?;
    writeln!(out, "- Ability Level: {}", result.ability_level)?;
    writeln!(out)?;

    writeln!(out, "### 🎓 College Recruitment Analysis")?;
    for check in &result.recruiting {
        if check.qualified {
            writeln!(
                out,
                "- {}: Qualified ✅ (cutoff {})",
                check.division.label(),
                check.cutoff
            )?;
        } else {
            writeln!(
                out,
                "- {}: Not Qualified ❌ (cutoff {}, {} to drop)",
                check.division.label(),
                check.cutoff,
                check.gap
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "### 🎯 Next Goals")?;
    match (result.next_level, result.next_level_time) {
        (Some(level), Some(time)) => {
            writeln!(out, "- Next Standard: {} ({})", level, time)?;
        }
        _ => {
            writeln!(out, "- Next Standard: none, already at the fastest standard")?;
        }
    }
    writeln!(out, "- Time Drop Needed: {} seconds", result.time_drop_needed)?;
    if let Some(hint) = &result.training_focus_hint {
        writeln!(out, "- Training Focus: {}", hint)?;
    }

    Ok(())
}

pub fn render_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
