use vaptest_types::{Evaluation, TestCase, TestResult};

/// One-line header for a test case.
///
/// `PASS|FAIL: <policy> - (<OP>) <refs>[ (Param: <param>)] - <EXPECT> ==> <ACTUAL>`.
/// For an update the new object comes first, then the old one.
pub fn summary_line(passed: bool, policy: &str, case: &TestCase, actual: &str) -> String {
    let mut line = format!("{}: {policy}", if passed { "PASS" } else { "FAIL" });
    match (case.valid_object(), case.valid_old_object()) {
        (Some(object), Some(old_object)) => {
            line.push_str(&format!(" - (UPDATE) {object} -> {old_object}"));
        }
        (Some(object), None) => line.push_str(&format!(" - (CREATE) {object}")),
        (None, Some(old_object)) => line.push_str(&format!(" - (DELETE) {old_object}")),
        (None, None) => {}
    }
    if let Some(param) = case.valid_param() {
        line.push_str(&format!(" (Param: {param})"));
    }
    line.push_str(&format!(" - {} ==> {actual}", case.expect.label()));
    line
}

/// Summary line plus detail lines. Details of evaluated, skipped, and
/// evaluation-error results appear only when the case failed or `verbose` is
/// set; setup and fatal errors always show theirs.
pub fn render_result(result: &TestResult, verbose: bool) -> String {
    let passed = result.passed();
    let show = !passed || verbose;
    let mut out = Vec::new();

    match result {
        TestResult::PolicyNotFound { policy } => {
            out.push(format!("FAIL: {policy} ==> {}", result.actual_label()));
        }
        TestResult::Evaluated {
            policy,
            case,
            decisions,
            ..
        } => {
            out.push(summary_line(passed, policy, case, result.actual_label()));
            if show {
                for d in decisions {
                    match d.evaluation {
                        Evaluation::Deny => out.push(format!(
                            "--- DENY: reason {}, message {}",
                            quote(&d.reason),
                            quote(&d.message)
                        )),
                        Evaluation::Error => out.push(format!(
                            "--- ERROR: reason {}, message {}",
                            quote(&d.reason),
                            quote(&d.message)
                        )),
                        Evaluation::Admit => {}
                    }
                }
            }
        }
        TestResult::Skipped {
            policy,
            case,
            failed_condition,
        } => {
            out.push(summary_line(passed, policy, case, result.actual_label()));
            if show {
                out.push(format!(
                    "--- NOT MATCH: condition-name {}",
                    quote(failed_condition)
                ));
            }
        }
        TestResult::SetupError {
            policy,
            case,
            errors,
        } => {
            out.push(summary_line(passed, policy, case, result.actual_label()));
            out.extend(errors.iter().map(|e| format!("--- ERROR: {e}")));
        }
        TestResult::EvalError {
            policy,
            case,
            errors,
        } => {
            out.push(summary_line(passed, policy, case, result.actual_label()));
            if show {
                out.extend(errors.iter().map(|e| format!("--- ERROR: {e}")));
            }
        }
        TestResult::FatalError {
            policy,
            case,
            errors,
        } => {
            out.push(summary_line(passed, policy, case, result.actual_label()));
            out.extend(errors.iter().map(|e| format!("--- ERROR: {e}")));
        }
    }

    out.join("\n")
}

/// Double-quoted string with Go `%q` escapes: `\xNN` for ASCII controls,
/// `\uNNNN` / `\UNNNNNNNN` for other non-printable characters.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if c < ' ' || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if !printable(c) => {
                let code = c as u32;
                if code < 0x10000 {
                    out.push_str(&format!("\\u{code:04x}"));
                } else {
                    out.push_str(&format!("\\U{code:08x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{ad}'
                | '\u{200b}'..='\u{200f}'
                | '\u{202a}'..='\u{202e}'
                | '\u{2060}'..='\u{2064}'
                | '\u{feff}'
                | '\u{e0000}'..='\u{e007f}'
        ))
}
