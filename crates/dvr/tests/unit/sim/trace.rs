use std::io::Write;

use dvr_core::common::TraceError;
use dvr_core::sim::{Trace, TraceHost};
use dvr_core::{CoreController, DynInst, PhysRegId};

const TRACE: &str = r#"{
    "stride_pcs": ["0x1000", 8192],
    "strides": [{"pc": "0x1000", "stride": 4}],
    "instructions": [
        {"pc": "0x1000", "inst": "0x0002b283", "srcs": [10], "dests": [5], "value": "0x10"},
        {"pc": "0x1004", "inst": 2265875, "srcs": [5], "dests": [6]},
        {"pc": "0x1008", "inst": "0x00c58533", "srcs": [{"index": 6}, {"class": "Int", "index": 9}],
         "dests": [7], "operands": [64, "0x8000"]},
        {"pc": "0x100c", "inst": "0x00628463", "srcs": [5, 6], "pred_taken": true, "pred_target": "0x1014"}
    ]
}"#;

#[test]
fn test_parse_trace() {
    let trace = Trace::from_json(TRACE).unwrap();
    assert!(trace.stride_pcs.contains(&0x1000));
    assert!(trace.stride_pcs.contains(&0x2000));
    assert_eq!(trace.strides.get(&0x1000), Some(&4));
    assert_eq!(trace.instructions.len(), 4);

    let ld = &trace.instructions[0];
    assert_eq!(ld.value, Some(16));
    assert!(ld.is_load());

    let slli = &trace.instructions[1];
    assert_eq!(slli.raw_inst(), 0x0022_9313);
    assert!(!slli.is_load());

    let add = &trace.instructions[2];
    assert_eq!(add.src_regs(), &[PhysRegId::int(6), PhysRegId::int(9)]);
    assert_eq!(add.src_operand(1), Some(0x8000));
    assert_eq!(add.src_operand(2), None);

    let beq = &trace.instructions[3];
    assert!(beq.is_direct_ctrl());
    assert!(beq.pred_taken());
    assert_eq!(beq.pred_target(), Some(0x1014));
    assert!(beq.dest_regs().is_empty());
}

#[test]
fn test_float_registers() {
    let trace = Trace::from_json(
        r#"{"instructions": [{"pc": 0, "inst": 0, "dests": [{"class": "Float", "index": 3}]}]}"#,
    )
    .unwrap();
    assert_eq!(trace.instructions[0].dests, vec![PhysRegId::float(3)]);
}

#[test]
fn test_host_answers_from_trace() {
    let trace = Trace::from_json(TRACE).unwrap();
    let mut host = TraceHost::new(&trace);
    assert!(host.is_stride_pc(0x1000));
    assert!(!host.is_stride_pc(0x1004));
    assert_eq!(host.stride_value(0x1000), 4);
    assert_eq!(host.stride_value(0x2000), 0);

    host.observe(&trace.instructions[1]);
    assert_eq!(host.latest_vector_load_value(), None);
    host.observe(&trace.instructions[0]);
    assert_eq!(host.latest_vector_load_value(), Some(16));
}

#[test]
fn test_bad_numbers() {
    let err = Trace::from_json(r#"{"stride_pcs": ["0xnope"]}"#).unwrap_err();
    assert!(matches!(err, TraceError::BadAddress(ref s) if s == "0xnope"));

    let err = Trace::from_json(r#"{"instructions": [{"pc": 4, "inst": "lw"}]}"#).unwrap_err();
    assert!(matches!(err, TraceError::BadEncoding { pc: 4, .. }));

    let err = Trace::from_json(r#"{"instructions": [{"pc": 4}]}"#).unwrap_err();
    assert!(matches!(err, TraceError::Parse(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TRACE.as_bytes()).unwrap();

    let trace = Trace::from_file(file.path()).unwrap();
    assert_eq!(trace.instructions.len(), 4);

    let err = Trace::from_file(file.path().with_extension("missing")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}
