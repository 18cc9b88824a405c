//! COO and factory-code extraction from email bodies.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref LINE_BREAK_TAG: Regex = Regex::new(
        r"(?i)<br\s*/?>|</(?:p|div|tr|li|table|h[1-6])\s*>"
    ).unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref HORIZONTAL_SPACE: Regex = Regex::new(r"[ \t\u{a0}\r]+").unwrap();
    static ref HAS_LETTER: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref HAS_ALNUM: Regex = Regex::new(r"[A-Za-z0-9]").unwrap();

    static ref COO_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?im)\bCOO\b[:\s]*([A-Za-z]{2,}(?:[ \t]+[A-Za-z]+)*)").unwrap(),
        Regex::new(r"(?im)Country[ \t]*of[ \t]*Origin[:\s]*([A-Za-z \t]+?)(?:;|,|$)").unwrap(),
        Regex::new(r"(?im)Made[ \t]*in[:\s]*([A-Za-z \t]+?)(?:;|,|$)").unwrap(),
        Regex::new(r"(?im)\bOrigin\b[:\s]*([A-Za-z \t]+?)(?:;|,|$)").unwrap(),
        Regex::new(r"(?im)\bCountry\b[:\s]*([A-Za-z \t]+?)(?:;|,|$)").unwrap(),
        Regex::new(r"(?im)\bCOO[ \t]*=[ \t]*([A-Za-z \t]+?)(?:;|,|$)").unwrap(),
    ];

    static ref FACTORY_PATTERNS: Vec<Regex> = [
        r"Factory\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Factory\s*ID[:\s=]*([^\n\r<>,;|\s]+)",
        r"Factory\s*[:=]\s*([A-Za-z0-9\-_.]+)",
        r"Supplier\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Supplier\s*[:=]\s*([A-Za-z0-9\-_.]+)",
        r"Plant\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Plant\s*ID[:\s=]*([^\n\r<>,;|\s]+)",
        r"Vendor\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Vendor\s*ID[:\s=]*([^\n\r<>,;|\s]+)",
        r"Vendor\s*[:=]\s*([A-Za-z0-9\-_.]+)",
        r"Mfg\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"\bMfg\s*[:=]\s*([A-Za-z0-9\-_.]+)",
        r"Manufacturer\s*[:=]\s*([A-Za-z0-9\-_.]+)",
        r"Manufacturing\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Production\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Mill\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"Site\s*Code[:\s=]*([^\n\r<>,;|\s]+)",
        r"\bLocation\s*[:=]\s*([A-Za-z0-9\-_.]+)",
        r"\bF\s*C\b[:\s=]*([A-Za-z0-9\-_.]+)",
        r"^([A-Z0-9]{3,}[-_][A-Z0-9]{2,})",
        r"^([A-Z]{2,}[0-9]{2,})",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?im){}", p)).unwrap())
    .collect();

    static ref STANDALONE_CODES: Vec<Regex> = vec![
        Regex::new(r"(?m)(?:^|\s)([A-Z]{2,}[0-9]{2,})(?:\s|$)").unwrap(),
        Regex::new(r"(?m)(?:^|\s)([A-Z0-9]{3,}[-_][A-Z0-9]{2,})(?:\s|$)").unwrap(),
        Regex::new(r"(?m)(?:^|\s)([A-Z]{3,}[-_][0-9]{2,})(?:\s|$)").unwrap(),
    ];

    static ref NEAR_FACTORY_LABEL: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:Factory|Supplier|Vendor|Plant|Mfg).*?([A-Za-z0-9\-_.]{3,})").unwrap(),
        Regex::new(r"(?i)([A-Za-z0-9\-_.]{3,}).*?(?:Factory|Supplier|Vendor|Plant)").unwrap(),
    ];
}

const COO_PLACEHOLDERS: [&str; 5] = ["n/a", "null", "none", "tbd", "na"];
const FACTORY_PLACEHOLDERS: [&str; 7] = ["n/a", "null", "none", "tbd", "na", "not", "applicable"];
const FACTORY_KEYWORDS: [&str; 11] = [
    "factory", "supplier", "vendor", "plant", "mfg", "manufacturer", "mill", "site", "location",
    "fc", "code",
];
const MAIL_PROVIDERS: [&str; 4] = ["email", "gmail", "yahoo", "hotmail"];

/// Fields printed on the merge cover page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailFields {
    pub country_of_origin: Option<String>,
    pub factory_code: Option<String>,
}

impl EmailFields {
    /// `(label, value)` pairs in cover-page order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 2] {
        [
            ("Country of Origin", self.country_of_origin.as_deref()),
            ("Factory Code", self.factory_code.as_deref()),
        ]
    }
}

/// Strip tags and collapse whitespace, keeping one line per block.
pub fn html_to_text(body: &str) -> String {
    let with_breaks = LINE_BREAK_TAG.replace_all(body, "\n");
    let without_tags = TAG.replace_all(&with_breaks, "");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(|line| HORIZONTAL_SPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Country of origin and factory code from an email body.
pub fn extract_email_fields(body: Option<&str>) -> EmailFields {
    let Some(body) = body else {
        return EmailFields::default();
    };
    let text = html_to_text(body);

    EmailFields {
        country_of_origin: find_country(&text),
        factory_code: find_factory_code(&text),
    }
}

fn find_country(text: &str) -> Option<String> {
    COO_PATTERNS.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            let value = collapse(&caps[1]);
            let accepted = !value.is_empty()
                && !is_placeholder(&value, &COO_PLACEHOLDERS)
                && value.chars().count() >= 2
                && HAS_LETTER.is_match(&value);
            accepted.then_some(value)
        })
    })
}

fn find_factory_code(text: &str) -> Option<String> {
    let labelled = FACTORY_PATTERNS.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            let value = collapse(&caps[1]);
            let accepted = value.chars().count() >= 2
                && !is_placeholder(&value, &FACTORY_PLACEHOLDERS)
                && HAS_ALNUM.is_match(&value);
            accepted.then_some(value)
        })
    });

    labelled
        .or_else(|| factory_from_key_value_lines(text))
        .or_else(|| {
            STANDALONE_CODES.iter().find_map(|re| {
                re.captures(text)
                    .map(|caps| caps[1].to_string())
                    .filter(|code| !MAIL_PROVIDERS.contains(&code.to_lowercase().as_str()))
            })
        })
        .or_else(|| {
            NEAR_FACTORY_LABEL.iter().find_map(|re| {
                re.captures(text)
                    .map(|caps| caps[1].to_string())
                    .filter(|code| code.len() >= 3 && HAS_ALNUM.is_match(code))
            })
        })
}

/// `key: value` / `key = value` lines whose key mentions a factory keyword.
fn factory_from_key_value_lines(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        [':', '='].into_iter().find_map(|sep| {
            let (key, value) = line.split_once(sep)?;
            let key = key.trim().to_lowercase();
            let value = value.trim();
            let accepted = FACTORY_KEYWORDS.iter().any(|k| key.contains(k))
                && value.chars().count() >= 2
                && HAS_ALNUM.is_match(value);
            accepted.then(|| value.to_string())
        })
    })
}

fn is_placeholder(value: &str, placeholders: &[&str]) -> bool {
    let lowered = value.to_lowercase();
    placeholders.contains(&lowered.as_str())
}

fn collapse(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
