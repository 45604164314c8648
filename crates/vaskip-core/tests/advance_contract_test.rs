//! Integration test: cursor advancement contract.
//!
//! Validates that:
//! 1. Literal-only formats consume nothing.
//! 2. Every legal (modifier, conversion) pair consumes exactly one slot of the
//!    table type, after any `*` arguments.
//! 3. Advancing over `A ++ B` equals advancing over `A` then `B`.
//! 4. Advancing is not idempotent: a second pass over an exhausted list underruns.
//! 5. A variadic wrapper can read its own trailing arguments after the skip.
//!
//! Run: cargo test -p vaskip-core --test advance_contract_test

use vaskip_core::{
    AdvanceError, AdvanceOptions, Arg, ArgList, ArgType, MalformedPolicy, TypeCheck, TypeTrace,
    advance, advance_with, consumption_plan,
};

const REJECT: AdvanceOptions = AdvanceOptions {
    malformed: MalformedPolicy::Reject,
};

fn plan(fmt: &str) -> Vec<ArgType> {
    consumption_plan(fmt.as_bytes(), &REJECT)
        .unwrap_or_else(|e| panic!("plan for {fmt:?} failed: {e}"))
}

/// (modifier, conversions, type) for every legal cell of the table.
fn table() -> Vec<(&'static str, &'static str, ArgType)> {
    use ArgType::*;
    vec![
        ("", "di", Int),
        ("", "oxXu", UInt),
        ("", "n", IntPtr),
        ("", "c", Int),
        ("", "s", CharPtr),
        ("", "fFeEgGaA", Double),
        ("", "p", VoidPtr),
        ("hh", "di", Int),
        ("hh", "oxXu", Int),
        ("hh", "n", SCharPtr),
        ("h", "di", Int),
        ("h", "oxXu", Int),
        ("h", "n", ShortPtr),
        ("l", "di", Long),
        ("l", "oxXu", ULong),
        ("l", "n", LongPtr),
        ("l", "c", WInt),
        ("l", "s", WCharPtr),
        ("l", "fFeEgGaA", Double),
        ("ll", "di", LongLong),
        ("ll", "oxXu", ULongLong),
        ("ll", "n", LongLongPtr),
        ("j", "di", IntMax),
        ("j", "oxXu", UIntMax),
        ("j", "n", IntMaxPtr),
        ("z", "di", SSize),
        ("z", "oxXu", Size),
        ("z", "n", SizePtr),
        ("t", "di", PtrDiff),
        ("t", "oxXu", UPtrDiff),
        ("t", "n", PtrDiffPtr),
        ("L", "fFeEgGaA", LongDouble),
    ]
}

#[test]
fn literal_only_formats_consume_nothing() {
    for fmt in ["", "plain", "no percent at all\n", "tabs\tand spaces  "] {
        let mut list = ArgList::new(Vec::new());
        let scan = advance_with(&mut list, fmt.as_bytes(), &REJECT).unwrap();
        assert_eq!(scan.consumed, 0, "{fmt:?}");
        assert_eq!(scan.scanned, fmt.len(), "{fmt:?}");
    }
}

#[test]
fn every_table_cell_consumes_its_type() {
    for (modifier, conversions, ty) in table() {
        for conv in conversions.chars() {
            let fmt = format!("%{modifier}{conv}");
            assert_eq!(plan(&fmt), vec![ty], "{fmt}");

            let with_width = format!("%*{modifier}{conv}");
            assert_eq!(plan(&with_width), vec![ArgType::Int, ty], "{with_width}");

            let with_both = format!("%-+*.*{modifier}{conv}");
            assert_eq!(
                plan(&with_both),
                vec![ArgType::Int, ArgType::Int, ty],
                "{with_both}"
            );

            let literal_prec = format!("%#012.3{modifier}{conv}");
            assert_eq!(plan(&literal_prec), vec![ty], "{literal_prec}");
        }
    }
}

#[test]
fn cells_outside_the_table_are_rejected() {
    let legal: Vec<String> = table()
        .into_iter()
        .flat_map(|(m, convs, _)| convs.chars().map(move |c| format!("{m}{c}")))
        .collect();
    for modifier in ["", "hh", "h", "l", "ll", "j", "z", "t", "L"] {
        for conv in "csdioxXufFeEaAgGnp".chars() {
            let cell = format!("{modifier}{conv}");
            if legal.contains(&cell) {
                continue;
            }
            let err = consumption_plan(format!("%{cell}").as_bytes(), &REJECT).unwrap_err();
            assert_eq!(err.kind_name(), "malformed_specifier", "%{cell}");
        }
    }
}

#[test]
fn byte_widths_of_common_directives() {
    assert_eq!(plan("%d")[0].size(), 4);
    assert!(plan("%d")[0].is_signed_integer());
    assert_eq!(plan("%lld")[0].size(), 8);
    assert!(plan("%lld")[0].is_signed_integer());
    assert_eq!(plan("%f")[0].size(), 8);
    assert_eq!(plan("%p")[0].size(), core::mem::size_of::<*const u8>());
}

#[test]
fn percent_escape_is_scanned_as_two_bytes() {
    let mut trace = TypeTrace::with_limit(0);
    let scan = advance_with(&mut trace, b"%%", &REJECT).unwrap();
    assert_eq!(scan.scanned, 2);
    assert_eq!(scan.consumed, 0);
    assert_eq!(scan.specifiers, 0);
}

#[test]
fn count_with_hh_takes_a_narrow_pointer() {
    let types = plan("%hhn");
    assert_eq!(types, vec![ArgType::SCharPtr]);
    assert!(types[0].is_pointer());
}

#[test]
fn concatenation_law_holds_for_directive_aligned_splits() {
    let pieces = [
        "",
        "text ",
        "%d",
        "%*.*s",
        "%%",
        "%5.2Lf and %hhn",
        "%zu|%tx|%jd",
        "%lc%ls",
        "%p%%%c",
    ];
    for a in pieces {
        for b in pieces {
            let joined = format!("{a}{b}");
            let mut expected = plan(a);
            expected.extend(plan(b));
            assert_eq!(plan(&joined), expected, "{a:?} ++ {b:?}");

            // Same through a real list: split advance lands where the joined one does.
            let slots: Vec<Arg<'_>> = expected
                .iter()
                .map(|&ty| Arg::pointer(ty, 0))
                .collect();
            let mut split = ArgList::new(slots.clone());
            advance_with(&mut split, a.as_bytes(), &REJECT).unwrap();
            advance_with(&mut split, b.as_bytes(), &REJECT).unwrap();
            let mut whole = ArgList::new(slots);
            advance_with(&mut whole, joined.as_bytes(), &REJECT).unwrap();
            assert_eq!(split.position(), whole.position());
            assert!(whole.is_exhausted());
        }
    }
}

#[test]
fn end_to_end_value_scenario() {
    let fmt = b"Value: %d, %5.*s%%done";
    let mut list = ArgList::new(vec![Arg::int(42), Arg::int(3), Arg::str("abcdef")]);

    let scan = advance_with(&mut list, fmt, &REJECT).unwrap();
    assert_eq!(scan.consumed, 3);
    assert_eq!(scan.specifiers, 2);
    assert_eq!(scan.scanned, fmt.len());
    assert!(list.is_exhausted());
    let consumed: Vec<ArgType> = list.consumed().iter().map(Arg::ty).collect();
    assert_eq!(
        consumed,
        vec![ArgType::Int, ArgType::Int, ArgType::CharPtr]
    );
}

#[test]
fn second_pass_over_exhausted_list_underruns() {
    let fmt = b"Value: %d, %5.*s%%done";
    let mut list = ArgList::new(vec![Arg::int(42), Arg::int(3), Arg::str("abcdef")]);
    advance(&mut list, fmt).unwrap();

    let err = advance(&mut list, fmt).unwrap_err();
    assert_eq!(
        err,
        AdvanceError::CursorUnderrun {
            position: 3,
            wanted: ArgType::Int,
        }
    );
}

#[test]
fn wrapper_reads_trailing_arguments_after_skip() {
    // Shape of `report(fmt, ..., severity, tag)`.
    let mut list = ArgList::new(vec![
        Arg::str("disk"),
        Arg::double(91.5),
        Arg::int(2),
        Arg::str("storage"),
    ]);
    advance(&mut list, b"%s at %.1f%% capacity").unwrap();

    let severity = list.next_arg(ArgType::Int).unwrap();
    assert_eq!(severity.value().as_signed(), Some(2));
    let tag = list.next_arg(ArgType::CharPtr).unwrap();
    assert_eq!(tag.value().as_text(), Some(&b"storage"[..]));
    assert!(list.is_exhausted());
}

#[test]
fn unchecked_list_matches_c_parity() {
    // A C caller passing an unsigned where %d is expected still advances.
    let mut list = ArgList::new(vec![Arg::uint(7), Arg::long(1)])
        .with_type_check(TypeCheck::Unchecked);
    advance_with(&mut list, b"%d %d", &REJECT).unwrap();
    assert!(list.is_exhausted());

    let mut strict = ArgList::new(vec![Arg::uint(7)]);
    let err = advance_with(&mut strict, b"%d", &REJECT).unwrap_err();
    assert_eq!(
        err,
        AdvanceError::TypeMismatch {
            position: 0,
            expected: ArgType::Int,
            found: ArgType::UInt,
        }
    );
}

#[test]
fn skip_policy_mirrors_c_scanner_on_garbage() {
    let skip = AdvanceOptions::default().with_malformed(MalformedPolicy::Skip);
    let mut trace = TypeTrace::new();
    let scan = advance_with(&mut trace, b"%y %*k %d %", &skip).unwrap();
    assert_eq!(trace.types(), &[ArgType::Int, ArgType::Int]);
    assert_eq!(scan.skipped, 3);
    assert_eq!(scan.specifiers, 1);
}
