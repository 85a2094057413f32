//! Module prototype extraction
//!
//! Reduces each parsed module to its interface: the parameters it declares
//! and the ports it exposes, with directions, data types and bit widths.
//!
//! Port widths are derived from the first packed range of the port's data
//! type. Only ranges of the form `[msb:0]` are understood; the low index must
//! be an integer literal equal to zero. Every identifier in `msb` has to be a
//! parameter of the same module.
//!
//! For non-ANSI modules the header only names the ports; their directions and
//! types come from `input`/`output`/`inout` declarations in the body, which
//! are reconciled against the header list here.

use std::num::IntErrorKind;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::parser::ast::{
    AnsiPortDefNode, BodyItem, DataTypeNode, Direction, Expr, ExprKind, ModuleNode,
    NonAnsiPortDefNode, ParamDefNode, PortList, SourceLocation, SourceUnit,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrototypeError {
    #[error("duplicated parameter name '{name}' in module '{module}'")]
    DuplicateParameter { module: String, name: String },
    #[error("duplicated port name '{name}' in module '{module}'")]
    DuplicatePort { module: String, name: String },
    #[error("duplicated port definition detail '{name}' in module '{module}'")]
    DuplicatePortDetail { module: String, name: String },
    #[error("port '{name}' is declared in the body of module '{module}' but missing from its non-ANSI port list")]
    PortNotInHeader { module: String, name: String },
    #[error("port '{name}' of module '{module}' is never given a direction")]
    MissingDirection { module: String, name: String },
    #[error("unsupported width range '{range}' in module '{module}', the lower index must be 0")]
    NonZeroLowIndex { module: String, range: String },
    #[error("range index in '{range}' of module '{module}' must be an integer")]
    NonIntegerIndex { module: String, range: String },
    #[error("range '{range}' of module '{module}' is too wide to compute its width")]
    IndexOverflow { module: String, range: String },
    #[error("'{name}' is used in port range '{range}' of module '{module}' but is not a parameter")]
    UndeclaredParameter {
        module: String,
        name: String,
        range: String,
    },
    #[error("module '{module}' has a non-ANSI port list but non-ANSI extraction is disabled")]
    NonAnsiDisabled { module: String },
}

pub type Result<T> = std::result::Result<T, PrototypeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Accept modules whose ports are declared in the body
    pub allow_non_ansi: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            allow_non_ansi: true,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_non_ansi(mut self, allow_non_ansi: bool) -> Self {
        self.allow_non_ansi = allow_non_ansi;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub local: bool,
    /// Source text of the declared data type
    pub data_type: Option<String>,
    /// Source text of the default value
    pub default: Option<String>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub direction: Direction,
    pub data_type: Option<String>,
    /// Bit width as a number (`"8"`) or an expression (`"W-1 + 1"`)
    pub width: Option<String>,
    pub ansi_location: Option<SourceLocation>,
    pub header_location: Option<SourceLocation>,
    pub body_location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePrototype {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    pub ports: Vec<PortInfo>,
    pub location: SourceLocation,
}

/// Port being assembled from a non-ANSI header entry and its body details
struct PendingPort {
    name: String,
    direction: Option<Direction>,
    data_type: Option<String>,
    width: Option<String>,
    header_location: SourceLocation,
    body_location: Option<SourceLocation>,
}

pub fn extract_prototypes(unit: &SourceUnit, options: &ExtractOptions) -> Result<Vec<ModulePrototype>> {
    unit.modules()
        .map(|module| extract_module_prototype(unit, module, options))
        .collect()
}

pub fn extract_module_prototype(
    unit: &SourceUnit,
    module: &ModuleNode,
    options: &ExtractOptions,
) -> Result<ModulePrototype> {
    tracing::info!(module = %module.name, "extracting module prototype");
    let extractor = Extractor { unit, module };

    let parameters = extractor.parameters()?;
    let known: FxHashMap<&str, usize> = parameters
        .iter()
        .enumerate()
        .map(|(index, param)| (param.name.as_str(), index))
        .collect();

    let ports = match &module.ports {
        PortList::Empty => Vec::new(),
        PortList::Ansi(groups) => extractor.ansi_ports(groups, &known)?,
        PortList::NonAnsi(header) => {
            if !options.allow_non_ansi {
                return Err(PrototypeError::NonAnsiDisabled {
                    module: module.name.clone(),
                });
            }
            extractor.non_ansi_ports(header, &known)?
        }
    };

    Ok(ModulePrototype {
        name: module.name.clone(),
        parameters,
        ports,
        location: module.location,
    })
}

struct Extractor<'a> {
    unit: &'a SourceUnit,
    module: &'a ModuleNode,
}

impl<'a> Extractor<'a> {
    fn module_name(&self) -> String {
        self.module.name.clone()
    }

    /// Header parameters followed by body `parameter`/`localparam` items
    fn parameters(&self) -> Result<Vec<ParameterInfo>> {
        let body = self.module.body.iter().filter_map(|item| match item {
            BodyItem::ParamDef(def) => Some(def),
            _ => None,
        });

        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        let mut parameters = Vec::new();
        for def in self.module.params.iter().chain(body) {
            for assignment in &def.assignments {
                if seen.insert(&assignment.name, parameters.len()).is_some() {
                    return Err(PrototypeError::DuplicateParameter {
                        module: self.module_name(),
                        name: assignment.name.clone(),
                    });
                }
                parameters.push(ParameterInfo {
                    name: assignment.name.clone(),
                    local: def.local,
                    data_type: self.data_type_text(def),
                    default: assignment
                        .default
                        .as_ref()
                        .map(|value| self.unit.node_text(value).to_string()),
                    location: assignment.location,
                });
            }
        }
        Ok(parameters)
    }

    fn data_type_text(&self, def: &ParamDefNode) -> Option<String> {
        def.data_type
            .as_ref()
            .map(|data_type| self.unit.node_text(data_type).to_string())
    }

    fn ansi_ports(
        &self,
        groups: &[AnsiPortDefNode],
        known: &FxHashMap<&str, usize>,
    ) -> Result<Vec<PortInfo>> {
        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        let mut ports = Vec::new();

        for group in groups {
            let (data_type, width) = self.port_type(group.data_type.as_ref(), known)?;
            for declarator in &group.declarators {
                if seen.insert(&declarator.name, ports.len()).is_some() {
                    return Err(PrototypeError::DuplicatePort {
                        module: self.module_name(),
                        name: declarator.name.clone(),
                    });
                }
                ports.push(PortInfo {
                    name: declarator.name.clone(),
                    direction: group.direction,
                    data_type: data_type.clone(),
                    width: width.clone(),
                    ansi_location: Some(declarator.location),
                    header_location: None,
                    body_location: None,
                });
            }
        }
        Ok(ports)
    }

    fn non_ansi_ports(
        &self,
        header: &[NonAnsiPortDefNode],
        known: &FxHashMap<&str, usize>,
    ) -> Result<Vec<PortInfo>> {
        let mut pending: Vec<PendingPort> = header
            .iter()
            .map(|port| PendingPort {
                name: port.name.clone(),
                direction: None,
                data_type: None,
                width: None,
                header_location: port.location,
                body_location: None,
            })
            .collect();

        let details = self.module.body.iter().filter_map(|item| match item {
            BodyItem::PortDef(def) => Some(def),
            _ => None,
        });
        for def in details {
            let (data_type, width) = self.port_type(def.data_type.as_ref(), known)?;
            for declarator in &def.declarators {
                let mut matches = pending
                    .iter_mut()
                    .filter(|port| port.name == declarator.name);
                let Some(port) = matches.next() else {
                    return Err(PrototypeError::PortNotInHeader {
                        module: self.module_name(),
                        name: declarator.name.clone(),
                    });
                };
                if matches.next().is_some() {
                    return Err(PrototypeError::DuplicatePort {
                        module: self.module_name(),
                        name: declarator.name.clone(),
                    });
                }
                if port.direction.is_some() {
                    return Err(PrototypeError::DuplicatePortDetail {
                        module: self.module_name(),
                        name: declarator.name.clone(),
                    });
                }
                port.direction = Some(def.direction);
                port.data_type = data_type.clone();
                port.width = width.clone();
                port.body_location = Some(declarator.location);
            }
        }

        pending
            .into_iter()
            .map(|port| {
                let Some(direction) = port.direction else {
                    return Err(PrototypeError::MissingDirection {
                        module: self.module_name(),
                        name: port.name,
                    });
                };
                Ok(PortInfo {
                    name: port.name,
                    direction,
                    data_type: port.data_type,
                    width: port.width,
                    ansi_location: None,
                    header_location: Some(port.header_location),
                    body_location: port.body_location,
                })
            })
            .collect()
    }

    /// Data type text and width of a port
    fn port_type(
        &self,
        data_type: Option<&DataTypeNode>,
        known: &FxHashMap<&str, usize>,
    ) -> Result<(Option<String>, Option<String>)> {
        let Some(data_type) = data_type else {
            return Ok((None, None));
        };
        let text = self.unit.node_text(data_type).to_string();
        let Some(range) = data_type.packed.first() else {
            return Ok((Some(text), None));
        };
        let range_text = self.unit.node_text(range).to_string();

        if self.literal_index(&range.right, &range_text)? != Some(0) {
            return Err(PrototypeError::NonZeroLowIndex {
                module: self.module_name(),
                range: range_text,
            });
        }

        if let Some(name) = range
            .left
            .identifiers()
            .into_iter()
            .find(|name| !known.contains_key(name))
        {
            return Err(PrototypeError::UndeclaredParameter {
                module: self.module_name(),
                name: name.to_string(),
                range: range_text,
            });
        }

        let width = match self.literal_index(&range.left, &range_text)? {
            Some(msb) => msb
                .checked_add(1)
                .ok_or_else(|| self.index_overflow(&range_text))?
                .to_string(),
            None => format!("{} + 1", self.unit.node_text(&range.left)),
        };
        Ok((Some(text), Some(width)))
    }

    /// Value of a literal range index; `None` when the index is not a literal.
    fn literal_index(&self, expr: &Expr, range_text: &str) -> Result<Option<u128>> {
        if !matches!(expr.kind, ExprKind::Literal { .. }) {
            return Ok(None);
        }
        let non_integer = || PrototypeError::NonIntegerIndex {
            module: self.module_name(),
            range: range_text.to_string(),
        };
        let (radix, digits) = expr.integer_digits().ok_or_else(non_integer)?;
        match u128::from_str_radix(&digits, radix) {
            Ok(value) => Ok(Some(value)),
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
                Err(self.index_overflow(range_text))
            }
            Err(_) => Err(non_integer()),
        }
    }

    fn index_overflow(&self, range_text: &str) -> PrototypeError {
        PrototypeError::IndexOverflow {
            module: self.module_name(),
            range: range_text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn unit(source: &str) -> SourceUnit {
        Parser::new(source)
            .expect("Parser creation failed")
            .parse()
            .expect("Parsing failed")
    }

    fn extract(source: &str) -> Result<Vec<ModulePrototype>> {
        extract_prototypes(&unit(source), &ExtractOptions::default())
    }

    #[test]
    fn test_literal_width() {
        let protos = extract("module m(input [7:0] a, input b); endmodule").unwrap();
        let ports = &protos[0].ports;
        assert_eq!(ports[0].width.as_deref(), Some("8"));
        assert_eq!(ports[0].data_type.as_deref(), Some("[7:0]"));
        assert_eq!(ports[1].width, None);
        assert_eq!(ports[1].data_type, None);
    }

    #[test]
    fn test_wide_literal_width() {
        let protos =
            extract("module m(input [64'hFFFF_FFFF_FFFF_FFFF:0] a); endmodule").unwrap();
        assert_eq!(
            protos[0].ports[0].width.as_deref(),
            Some("18446744073709551616")
        );
    }

    #[test]
    fn test_width_beyond_u128_is_an_error() {
        let err = extract(
            "module m(input [132'h1_0000_0000_0000_0000_0000_0000_0000_0000:0] a); endmodule",
        )
        .unwrap_err();
        assert!(matches!(err, PrototypeError::IndexOverflow { .. }));

        let err = extract(
            "module m(input [128'hFFFF_FFFF_FFFF_FFFF_FFFF_FFFF_FFFF_FFFF:0] a); endmodule",
        )
        .unwrap_err();
        assert!(matches!(err, PrototypeError::IndexOverflow { .. }));
    }

    #[test]
    fn test_based_low_index_is_accepted() {
        let protos = extract("module m(input [4'hf:'b0] a); endmodule").unwrap();
        assert_eq!(protos[0].ports[0].width.as_deref(), Some("16"));
    }

    #[test]
    fn test_nonzero_low_index() {
        let err = extract("module m(input [8:1] a); endmodule").unwrap_err();
        assert_eq!(
            err,
            PrototypeError::NonZeroLowIndex {
                module: "m".to_string(),
                range: "[8:1]".to_string()
            }
        );
        let err = extract("module m #(L = 0) (input [8:L] a); endmodule").unwrap_err();
        assert!(matches!(err, PrototypeError::NonZeroLowIndex { .. }));
    }

    #[test]
    fn test_real_index() {
        let err = extract("module m(input [1.5:0] a); endmodule").unwrap_err();
        assert!(matches!(err, PrototypeError::NonIntegerIndex { .. }));
    }

    #[test]
    fn test_duplicate_parameter_across_header_and_body() {
        let err = extract("module m #(W = 1) (); parameter W = 2; endmodule").unwrap_err();
        assert!(matches!(err, PrototypeError::DuplicateParameter { .. }));
    }

    #[test]
    fn test_non_ansi_disabled() {
        let unit = unit("module m(a); input a; endmodule");
        let options = ExtractOptions::new().with_allow_non_ansi(false);
        let err = extract_prototypes(&unit, &options).unwrap_err();
        assert_eq!(
            err,
            PrototypeError::NonAnsiDisabled {
                module: "m".to_string()
            }
        );
    }
}
