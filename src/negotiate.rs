//! `Accept` header negotiation between JSON and plain text.
//!
//! Guards only ever render two representations, so negotiation collapses to
//! one question: does the client want JSON more than it wants plain text?
//!
//! | `Accept`                               | rendering |
//! |----------------------------------------|-----------|
//! | *(absent)*, empty, `*/*`               | text      |
//! | `application/json`                     | JSON      |
//! | `application/problem+json`             | JSON      |
//! | `text/plain`                           | text      |
//! | `text/plain, application/json`         | JSON      |
//! | `application/json;q=0.5, text/plain`   | text      |
//! | `application/*, application/json;q=0`  | text      |
//!
//! A bare `*/*` says nothing about preference, so it falls through to text.
//! For each of the two types the most specific matching range decides its
//! quality; JSON wins when it is acceptable at all and at least as preferred
//! as text.

/// Returns `true` when an error body should be rendered as JSON for a
/// request carrying this `Accept` header value.
pub fn prefers_json(accept: Option<&str>) -> bool {
    let Some(accept) = accept else { return false };

    let mut json = Preference::default();
    let mut text = Preference::default();

    for range in accept.split(',') {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let Some((kind, subtype)) = media.split_once('/') else { continue };

        let Some(q) = quality(parts) else { continue };

        match (kind, subtype) {
            ("application", "json") => json.offer(2, q),
            ("application", s) if s.ends_with("+json") => json.offer(2, q),
            ("application", "*") => json.offer(1, q),
            ("text", "plain") => text.offer(2, q),
            ("text", "*") => text.offer(1, q),
            _ => {}
        }
    }

    json.q > 0 && json.q >= text.q
}

/// Quality of the most specific range seen so far for one media type.
///
/// `q` is in thousandths so comparisons stay exact.
#[derive(Default)]
struct Preference {
    specificity: u8,
    q: u16,
}

impl Preference {
    fn offer(&mut self, specificity: u8, q: u16) {
        if specificity > self.specificity {
            *self = Self { specificity, q };
        } else if specificity == self.specificity {
            self.q = self.q.max(q);
        }
    }
}

/// Extracts the `q` parameter. `None` for a malformed weight, which drops the
/// whole range.
fn quality<'a>(params: impl Iterator<Item = &'a str>) -> Option<u16> {
    for param in params {
        let Some((name, value)) = param.split_once('=') else { continue };
        if !name.trim().eq_ignore_ascii_case("q") {
            continue;
        }
        let q: f32 = value.trim().parse().ok()?;
        if !(0.0..=1.0).contains(&q) {
            return None;
        }
        return Some((q * 1000.0).round() as u16);
    }
    Some(1000)
}

#[cfg(test)]
mod tests {
    use super::prefers_json;

    #[test]
    fn no_preference_renders_text() {
        assert!(!prefers_json(None));
        assert!(!prefers_json(Some("")));
        assert!(!prefers_json(Some("*/*")));
    }

    #[test]
    fn json_ranges() {
        assert!(prefers_json(Some("application/json")));
        assert!(prefers_json(Some("Application/JSON")));
        assert!(prefers_json(Some("application/problem+json")));
        assert!(prefers_json(Some("application/*")));
        assert!(prefers_json(Some("text/html, application/json;q=0.9, */*;q=0.8")));
    }

    #[test]
    fn text_ranges() {
        assert!(!prefers_json(Some("text/plain")));
        assert!(!prefers_json(Some("text/*")));
        assert!(!prefers_json(Some("text/html")));
    }

    #[test]
    fn equal_weights_favour_json() {
        assert!(prefers_json(Some("text/plain, application/json")));
    }

    #[test]
    fn weights_are_respected() {
        assert!(!prefers_json(Some("application/json;q=0.5, text/plain")));
        assert!(prefers_json(Some("application/json; q=0.9, text/plain; q=0.1")));
        assert!(!prefers_json(Some("application/json;q=0")));
    }

    #[test]
    fn most_specific_range_decides() {
        assert!(!prefers_json(Some("application/*, application/json;q=0")));
        assert!(prefers_json(Some("text/*, text/plain;q=0.2, application/json;q=0.5")));
    }

    #[test]
    fn malformed_weights_drop_the_range() {
        assert!(!prefers_json(Some("application/json;q=abc")));
        assert!(!prefers_json(Some("application/json;q=2")));
        assert!(!prefers_json(Some("json")));
    }
}
