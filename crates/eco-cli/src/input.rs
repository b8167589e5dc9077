//! Textual scenario format.
//!
//! Seven integers (rabbit breeding, fox breeding, fox starvation,
//! generations, rows, cols, object count) followed by one
//! `KIND row col` triple per object. Tokens are whitespace separated.

use eco_core::{CellKind, EcosystemConfig, Error, Placement, Result, Scenario};
use std::fmt::Write as _;
use std::str::FromStr;

pub fn parse_scenario(text: &str) -> Result<Scenario> {
    let mut tokens = Tokens::new(text);

    let config = EcosystemConfig {
        rabbit_breeding: tokens.number("rabbit breeding threshold")?,
        fox_breeding: tokens.number("fox breeding threshold")?,
        fox_starvation: tokens.number("fox starvation threshold")?,
        generations: tokens.number("generation count")?,
        rows: tokens.number("row count")?,
        cols: tokens.number("column count")?,
    };
    config.validate()?;
    let count: usize = tokens.number("object count")?;

    let mut placements = Vec::with_capacity(count.min(config.cell_count()));
    for index in 0..count {
        let tag = tokens
            .next()
            .ok_or_else(|| Error::Parse(format!("expected {count} objects, found {index}")))?;
        let kind: CellKind = tag.parse()?;
        let row = tokens.number("object row")?;
        let col = tokens.number("object column")?;
        placements.push(Placement::new(kind, row, col));
    }

    let scenario = Scenario::new(config, placements);
    scenario.validate()?;
    Ok(scenario)
}

/// Render `scenario` in the format [`parse_scenario`] reads.
pub fn write_scenario(scenario: &Scenario) -> String {
    let c = &scenario.config;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} {} {} {} {}",
        c.rabbit_breeding,
        c.fox_breeding,
        c.fox_starvation,
        c.generations,
        c.rows,
        c.cols,
        scenario.placements.len()
    );
    for placement in &scenario.placements {
        let _ = writeln!(out, "{placement}");
    }
    out
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    fn number<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .next()
            .ok_or_else(|| Error::Parse(format!("missing {what}")))?;
        token
            .parse()
            .map_err(|_| Error::Parse(format!("invalid {what}: {token:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2 4 3 6 5 5 9
ROCK 0 0
RABBIT 0 2
FOX 0 4
FOX 1 0
FOX 1 4
ROCK 2 4
RABBIT 3 0
RABBIT 4 0
FOX 4 4
";

    #[test]
    fn test_parse_sample() {
        let scenario = parse_scenario(SAMPLE).unwrap();
        assert_eq!(scenario.config, EcosystemConfig::default());
        assert_eq!(scenario.placements.len(), 9);
        assert_eq!(scenario.placements[0], Placement::new(CellKind::Rock, 0, 0));
        assert_eq!(scenario.placements[8], Placement::new(CellKind::Fox, 4, 4));
    }

    #[test]
    fn test_write_then_parse_matches_input() {
        let scenario = parse_scenario(SAMPLE).unwrap();
        assert_eq!(write_scenario(&scenario), SAMPLE);
    }

    #[test]
    fn test_tokens_may_span_lines() {
        let scenario = parse_scenario("1 1 1 1\n2 2 1 RABBIT\n1\n1").unwrap();
        assert_eq!(scenario.placements, vec![Placement::new(CellKind::Rabbit, 1, 1)]);
    }

    #[test]
    fn test_missing_header_value() {
        let err = parse_scenario("2 4 3 6 5").unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("column count")));
    }

    #[test]
    fn test_malformed_number() {
        let err = parse_scenario("2 4 x 6 5 5 0").unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("fox starvation")));
    }

    #[test]
    fn test_too_few_objects() {
        let err = parse_scenario("2 4 3 6 5 5 2\nROCK 0 0\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_unknown_tag() {
        let err = parse_scenario("2 4 3 6 5 5 1\nWOLF 0 0\n").unwrap_err();
        assert!(matches!(err, Error::UnknownObject(ref tag) if tag == "WOLF"));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let err = parse_scenario("2 4 3 6 5 5 1\nFOX 5 0\n").unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { row: 5, col: 0, .. }));

        let err = parse_scenario("2 4 3 6 5 5 1\nFOX -1 0\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = parse_scenario("2 4 3 6 0 5 0").unwrap_err();
        assert!(err.is_config());
    }
}
