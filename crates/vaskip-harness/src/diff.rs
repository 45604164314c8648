//! Diff rendering for fixture comparison.

/// Render a field-by-field diff between two canonical outcome strings.
///
/// Outcomes are `;`-separated `key=value` fields; only differing fields are
/// listed.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let expected_fields = fields(expected);
    let actual_fields = fields(actual);

    let mut keys: Vec<&str> = expected_fields.iter().map(|&(k, _)| k).collect();
    for &(key, _) in &actual_fields {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    for key in keys {
        let e = lookup(&expected_fields, key);
        let a = lookup(&actual_fields, key);
        if e == a {
            continue;
        }
        out.push_str(&format!("@@ {key} @@\n"));
        if let Some(e) = e {
            out.push_str(&format!("-{e}\n"));
        }
        if let Some(a) = a {
            out.push_str(&format!("+{a}\n"));
        }
    }
    out
}

fn fields(outcome: &str) -> Vec<(&str, &str)> {
    outcome
        .split(';')
        .filter(|field| !field.is_empty())
        .map(|field| field.split_once('=').unwrap_or((field, "")))
        .collect()
}

fn lookup<'a>(fields: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    fields.iter().find(|&&(k, _)| k == key).map(|&(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_outcomes() {
        assert_eq!(
            render_diff("consumed=[];remaining=0", "consumed=[];remaining=0"),
            "[identical]"
        );
    }

    #[test]
    fn lists_only_changed_fields() {
        let diff = render_diff(
            "consumed=[int,int];remaining=0",
            "error=cursor_underrun@1;consumed=[int];remaining=0",
        );
        assert_eq!(
            diff,
            "--- expected\n+++ actual\n@@ consumed @@\n-[int,int]\n+[int]\n@@ error @@\n+cursor_underrun@1\n"
        );
    }
}
