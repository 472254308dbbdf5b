use std::fmt;
use std::time::Duration;

use crate::problems::Problem;

/// A problem together with the answer that was given for it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Attempt {
    pub problem: Problem,
    pub answer: u32,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.problem, self.answer)
    }
}

/// Outcome of one drill session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrillReport {
    pub correct: Vec<Attempt>,
    pub wrong: Vec<Attempt>,
    /// Elapsed drill time as formatted by [`format_time`].
    pub elapsed: String,
    pub pauses: u32,
}

impl DrillReport {
    pub fn total(&self) -> usize {
        self.correct.len() + self.wrong.len()
    }
}

impl fmt::Display for DrillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "score    {} / {}", self.correct.len(), self.total())?;
        writeln!(f, "time     {}", self.elapsed)?;
        writeln!(f, "pauses   {}", self.pauses)?;
        for attempt in &self.wrong {
            writeln!(
                f,
                "  missed {}  (expected {})",
                attempt,
                attempt.problem.product()
            )?;
        }
        Ok(())
    }
}

/// Grades `answers` against `problems` position by position.
///
/// Unanswered problems are graded as an answer of 0.
pub fn grade(problems: &[Problem], answers: &[u32], elapsed: Duration, pauses: u32) -> DrillReport {
    let mut report = DrillReport {
        elapsed: format_time(elapsed.as_secs()),
        pauses,
        ..DrillReport::default()
    };

    for (i, &problem) in problems.iter().enumerate() {
        let answer = answers.get(i).copied().unwrap_or(0);
        let attempt = Attempt { problem, answer };
        if problem.is_correct(answer) {
            report.correct.push(attempt);
        } else {
            report.wrong.push(attempt);
        }
    }
    report
}

/// Formats whole seconds as `HH:MM:SS`, dropping leading zero groups.
///
/// Hours are omitted when zero; minutes too when hours and minutes are both
/// zero. Seconds always keep their leading colon.
pub fn format_time(seconds: u64) -> String {
    let s = seconds % 60;
    let m = (seconds / 60) % 60;
    let h = seconds / 3600;

    match (h, m) {
        (0, 0) => format!(":{s:02}"),
        (0, _) => format!(":{m:02}:{s:02}"),
        _ => format!("{h:02}:{m:02}:{s:02}"),
    }
}
