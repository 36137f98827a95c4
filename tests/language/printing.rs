//! Integration tests for condition printing

use questlogic_language::pretty::outline;
use questlogic_language::{CriterionKind, parse};

#[test]
fn printed_conditions_parse_back() {
    for source in [
        "Qf=1&Qf!3&PL>10",
        "Qf=1|(Qf=2&PG=3)",
        "(Qf=10&PG=1)|(Qf=11&PG=2)",
        "Qf=9&(Qf=1|Qf=2)&Ps=1",
    ] {
        let printed = parse(source).unwrap().group.to_string();
        assert_eq!(printed, source);
        assert_eq!(parse(&printed).unwrap().group, parse(source).unwrap().group);
    }
}

#[test]
fn outline_is_indented() {
    let parsed = parse("Qf=9&(Qf=1|PG=2)&PL>10").unwrap();
    assert_eq!(
        outline(&parsed.group),
        "AND\n  9\n  OR\n    1\n    Class = 2\n  Level > 10\n"
    );
}

#[test]
fn criterion_labels() {
    let parsed = parse("Qf!4&Ps!2&Pa>3&Pm=7").unwrap();
    let labels: Vec<String> = parsed.group.criteria().iter().map(|c| c.describe()).collect();
    assert_eq!(
        labels,
        vec!["!4", "Alignment != 2", "Alignment level > 3", "Position = 7"]
    );
}

#[test]
fn codes_round_trip() {
    for kind in CriterionKind::ALL {
        assert_eq!(CriterionKind::from_code(kind.code()), Some(kind));
    }
    assert_eq!(CriterionKind::from_code("Zz"), None);
}
