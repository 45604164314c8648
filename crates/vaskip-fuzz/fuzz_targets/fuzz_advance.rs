#![no_main]
use libfuzzer_sys::fuzz_target;
use vaskip_core::{
    AdvanceOptions, Arg, ArgList, ArgValue, Directives, MalformedPolicy, Segment, TypeTrace,
    advance_with,
};

fuzz_target!(|data: &[u8]| {
    // Segments tile the scanned prefix in order and never run past it.
    let mut directives = Directives::new(data);
    let scanned = directives.format_len();
    assert!(scanned <= data.len());
    let mut last = 0;
    while let Some(segment) = directives.next() {
        let offset = match segment {
            Segment::Literal { offset, .. }
            | Segment::Percent { offset }
            | Segment::Spec { offset, .. }
            | Segment::Malformed { offset, .. } => offset,
        };
        assert!(offset >= last && offset < scanned);
        assert!(directives.position() > offset && directives.position() <= scanned);
        last = offset;
    }

    for policy in [MalformedPolicy::Reject, MalformedPolicy::Skip] {
        let options = AdvanceOptions::default().with_malformed(policy);
        let mut trace = TypeTrace::new();
        let result = advance_with(&mut trace, data, &options);
        if policy == MalformedPolicy::Skip {
            // An unbounded trace never underruns, and skipping never rejects.
            assert!(result.is_ok());
        }
        let Ok(scan) = result else {
            continue;
        };
        assert_eq!(scan.scanned, scanned);
        assert_eq!(scan.consumed, trace.len());

        // Replaying the plan against exactly-typed slots consumes every slot.
        let mut list: ArgList<'_> = trace
            .types()
            .iter()
            .map(|&ty| Arg::new(ty, ArgValue::Address(0)))
            .collect();
        assert!(advance_with(&mut list, data, &options).is_ok());
        assert!(list.is_exhausted());
    }
});
