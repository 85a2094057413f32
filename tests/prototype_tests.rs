// Module prototype extraction tests

use svparse::parser::ast::{Direction, SourceLocation};
use svparse::prototype::{extract_prototypes, ExtractOptions, ModulePrototype, PrototypeError};

fn extract(source: &str) -> Result<Vec<ModulePrototype>, PrototypeError> {
    let unit = svparse::parse_str(source).expect("Parsing failed");
    extract_prototypes(&unit, &ExtractOptions::default())
}

#[test]
fn test_ansi_module_prototype() {
    let protos = extract(
        r#"
module fifo #(
    parameter int WIDTH = 8,
    parameter DEPTH = 16
) (
    input  logic             clk,
    input  logic [WIDTH-1:0] din,
    output logic [3:0]       level,
    output logic             full, empty
);
    localparam AW = $clog2(DEPTH);
endmodule
"#,
    )
    .expect("Extraction failed");

    assert_eq!(protos.len(), 1);
    let fifo = &protos[0];
    assert_eq!(fifo.name, "fifo");
    assert_eq!(fifo.location, SourceLocation::new(2, 1));

    let params: Vec<(&str, Option<&str>, Option<&str>, bool)> = fifo
        .parameters
        .iter()
        .map(|p| {
            (
                p.name.as_str(),
                p.data_type.as_deref(),
                p.default.as_deref(),
                p.local,
            )
        })
        .collect();
    assert_eq!(
        params,
        vec![
            ("WIDTH", Some("int"), Some("8"), false),
            ("DEPTH", None, Some("16"), false),
            ("AW", None, Some("$clog2(DEPTH)"), true),
        ]
    );

    let ports: Vec<(&str, Direction, Option<&str>)> = fifo
        .ports
        .iter()
        .map(|p| (p.name.as_str(), p.direction, p.width.as_deref()))
        .collect();
    assert_eq!(
        ports,
        vec![
            ("clk", Direction::Input, None),
            ("din", Direction::Input, Some("WIDTH-1 + 1")),
            ("level", Direction::Output, Some("4")),
            ("full", Direction::Output, None),
            ("empty", Direction::Output, None),
        ]
    );
    assert_eq!(fifo.ports[1].data_type.as_deref(), Some("logic [WIDTH-1:0]"));
    assert_eq!(fifo.ports[1].ansi_location, Some(SourceLocation::new(7, 30)));
    assert!(fifo.ports[1].header_location.is_none());
}

#[test]
fn test_non_ansi_reconciliation() {
    let protos = extract(
        "module m (a, y);\n  input [7:0] a;\n  output y;\n  wire unused;\nendmodule\n",
    )
    .expect("Extraction failed");
    let ports = &protos[0].ports;
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0].name, "a");
    assert_eq!(ports[0].direction, Direction::Input);
    assert_eq!(ports[0].width.as_deref(), Some("8"));
    assert_eq!(ports[0].header_location, Some(SourceLocation::new(1, 11)));
    assert_eq!(ports[0].body_location, Some(SourceLocation::new(2, 15)));
    assert_eq!(ports[1].direction, Direction::Output);
    assert!(ports[1].ansi_location.is_none());
}

#[test]
fn test_body_port_missing_from_header() {
    let err = extract("module m (a); input a, b; endmodule").unwrap_err();
    assert_eq!(
        err,
        PrototypeError::PortNotInHeader {
            module: "m".to_string(),
            name: "b".to_string()
        }
    );
}

#[test]
fn test_duplicate_port_detail() {
    let err = extract("module m (a); input a; output a; endmodule").unwrap_err();
    assert!(matches!(err, PrototypeError::DuplicatePortDetail { .. }));
}

#[test]
fn test_header_duplicate_found_at_reconciliation() {
    let err = extract("module m (a, a); input a; endmodule").unwrap_err();
    assert_eq!(
        err,
        PrototypeError::DuplicatePort {
            module: "m".to_string(),
            name: "a".to_string()
        }
    );
}

#[test]
fn test_port_without_direction() {
    let err = extract("module m (a, b); input a; endmodule").unwrap_err();
    assert_eq!(
        err,
        PrototypeError::MissingDirection {
            module: "m".to_string(),
            name: "b".to_string()
        }
    );
}

#[test]
fn test_duplicate_ansi_port() {
    let err = extract("module m (input a, output a); endmodule").unwrap_err();
    assert!(matches!(err, PrototypeError::DuplicatePort { .. }));
}

#[test]
fn test_width_uses_undeclared_name() {
    let err = extract("module m (input [N-1:0] a); endmodule").unwrap_err();
    assert_eq!(
        err,
        PrototypeError::UndeclaredParameter {
            module: "m".to_string(),
            name: "N".to_string(),
            range: "[N-1:0]".to_string()
        }
    );
}

#[test]
fn test_multiple_modules() {
    let protos = extract("module a; endmodule\nmodule b (input x); endmodule").unwrap();
    let names: Vec<&str> = protos.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(protos[0].ports.is_empty());
}

#[test]
fn test_width_with_conditional_msb() {
    let protos =
        extract("module m #(W = 4) (input [(W > 8 ? W : 8)-1:0] a); endmodule").unwrap();
    assert_eq!(
        protos[0].ports[0].width.as_deref(),
        Some("(W > 8 ? W : 8)-1 + 1")
    );
}

#[test]
fn test_wide_literal_msb() {
    let protos = extract("module m(input [64'hFFFF_FFFF_FFFF_FFFF:0] a); endmodule").unwrap();
    assert_eq!(
        protos[0].ports[0].width.as_deref(),
        Some("18446744073709551616")
    );
}
