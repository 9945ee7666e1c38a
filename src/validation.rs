use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref LETTERS_RE: Regex = Regex::new(r"(?i)^[a-z]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Course,
}

enum Rule {
    Required,
    Email,
    Pattern(&'static Regex),
}

struct FieldRules {
    /// JSON key in the request body.
    field: &'static str,
    /// Human-readable name used in error messages.
    label: &'static str,
    rules: Vec<Rule>,
}

lazy_static! {
    static ref USER_RULES: Vec<FieldRules> = vec![
        FieldRules {
            field: "firstName",
            label: "first name",
            rules: vec![Rule::Required, Rule::Pattern(&LETTERS_RE)],
        },
        FieldRules {
            field: "lastName",
            label: "last name",
            rules: vec![Rule::Required, Rule::Pattern(&LETTERS_RE)],
        },
        FieldRules {
            field: "emailAddress",
            label: "email address",
            rules: vec![Rule::Required, Rule::Email],
        },
        FieldRules {
            field: "password",
            label: "password",
            rules: vec![Rule::Required],
        },
    ];
    static ref COURSE_RULES: Vec<FieldRules> = vec![
        FieldRules {
            field: "title",
            label: "title",
            rules: vec![Rule::Required],
        },
        FieldRules {
            field: "description",
            label: "description",
            rules: vec![Rule::Required],
        },
    ];
}

/// Checks `body` against the rule set for `kind` and returns one
/// message per failing field (the first failing rule wins). An empty
/// vector means the body passed.
pub fn validate(kind: ResourceKind, body: &Value) -> Vec<String> {
    let rules = match kind {
        ResourceKind::User => &*USER_RULES,
        ResourceKind::Course => &*COURSE_RULES,
    };

    let mut errors = Vec::new();
    for field in rules.iter() {
        let value = body.get(field.field).and_then(Value::as_str);
        for rule in &field.rules {
            let failed = match rule {
                Rule::Required => value.map_or(true, |s| s.trim().is_empty()),
                Rule::Email => value.map_or(true, |s| !EMAIL_RE.is_match(s)),
                Rule::Pattern(re) => value.map_or(true, |s| !re.is_match(s)),
            };
            if failed {
                errors.push(match rule {
                    Rule::Required => format!("Please provide a value for \"{}\"", field.label),
                    _ => format!("Please provide a valid \"{}\"", field.label),
                });
                break;
            }
        }
    }
    errors
}
