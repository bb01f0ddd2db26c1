//! Parameter validation against an action's schema.
//!
//! Validation is schema-driven: every parameter the action defines is
//! checked, parameters the schema does not mention are ignored, and the
//! first violation is returned.

use std::collections::HashMap;

use kairo_types::action_types::{Action, ParamDef, ParamMap, ParamType, ParamValue};

use crate::prelude::*;

/// Checks invocation parameters against a parameter schema
pub fn validate_params(
	schema: &HashMap<Box<str>, ParamDef>,
	params: Option<&ParamMap>,
) -> Result<(), ParamError> {
	for (name, def) in schema {
		match params.and_then(|p| p.get(&**name)) {
			Some(value) => validate_value(name, value, def)?,
			None if def.required => {
				return Err(ParamError::new(name, ParamViolation::Missing));
			}
			None => {}
		}
	}
	Ok(())
}

/// Checks one present value against its definition
pub fn validate_value(name: &str, value: &ParamValue, def: &ParamDef) -> Result<(), ParamError> {
	let wrong_type = || ParamError::new(name, ParamViolation::WrongType(def.typ));

	match def.typ {
		ParamType::String => {
			let ParamValue::String(s) = value else {
				return Err(wrong_type());
			};
			if !def.r#enum.is_empty() && !def.r#enum.iter().any(|e| &**e == s.as_str()) {
				return Err(ParamError::new(name, ParamViolation::NotInEnum(def.r#enum.clone())));
			}
		}
		ParamType::Number => {
			// Integers, floats and arbitrary-precision numbers all compare as f64
			let Some(n) = (match value {
				ParamValue::Number(n) => n.as_f64(),
				ParamValue::Null
				| ParamValue::Bool(_)
				| ParamValue::String(_)
				| ParamValue::Array(_)
				| ParamValue::Object(_) => None,
			}) else {
				return Err(wrong_type());
			};
			if let Some(min) = def.min {
				if n < min {
					return Err(ParamError::new(name, ParamViolation::BelowMin(min)));
				}
			}
			if let Some(max) = def.max {
				if n > max {
					return Err(ParamError::new(name, ParamViolation::AboveMax(max)));
				}
			}
		}
		ParamType::Boolean => {
			if !value.is_boolean() {
				return Err(wrong_type());
			}
		}
		// Not structurally validated
		ParamType::Object | ParamType::Array => {}
	}
	Ok(())
}

/// Registration-time check of an action definition.
///
/// Rejects empty ids and names, constraints that do not apply to the
/// parameter's type, and inverted numeric ranges.
pub fn check_definition(action: &Action) -> KrResult<()> {
	if action.id.is_empty() {
		return Err(Error::InvalidAction("id is required".into()));
	}
	if action.name.is_empty() {
		return Err(Error::InvalidAction("name is required".into()));
	}
	check_schema(&action.parameters)
}

pub fn check_schema(schema: &HashMap<Box<str>, ParamDef>) -> KrResult<()> {
	for (name, def) in schema {
		if name.is_empty() {
			return Err(Error::InvalidAction("parameter names must not be empty".into()));
		}
		if !def.r#enum.is_empty() && def.typ != ParamType::String {
			return Err(Error::InvalidAction(
				format!("parameter {}: enum is only allowed on string parameters", name).into(),
			));
		}
		if (def.min.is_some() || def.max.is_some()) && def.typ != ParamType::Number {
			return Err(Error::InvalidAction(
				format!("parameter {}: min/max are only allowed on number parameters", name)
					.into(),
			));
		}
		if let (Some(min), Some(max)) = (def.min, def.max) {
			if min > max {
				return Err(Error::InvalidAction(
					format!("parameter {}: min is greater than max", name).into(),
				));
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn schema(entries: &[(&str, ParamDef)]) -> HashMap<Box<str>, ParamDef> {
		entries.iter().map(|(name, def)| (Box::from(*name), def.clone())).collect()
	}

	fn params(value: serde_json::Value) -> ParamMap {
		match value {
			serde_json::Value::Object(map) => map,
			_ => ParamMap::new(),
		}
	}

	fn level_schema() -> HashMap<Box<str>, ParamDef> {
		schema(&[("level", ParamDef::new(ParamType::Number).required().range(Some(1.0), Some(5.0)))])
	}

	fn mode_schema() -> HashMap<Box<str>, ParamDef> {
		schema(&[("mode", ParamDef::new(ParamType::String).one_of(["auto", "manual"]))])
	}

	#[test]
	fn test_required_number_with_range() {
		let schema = level_schema();

		let err = validate_params(&schema, Some(&params(json!({}))));
		assert_eq!(err, Err(ParamError::new("level", ParamViolation::Missing)));
		let err = validate_params(&schema, None);
		assert_eq!(err, Err(ParamError::new("level", ParamViolation::Missing)));

		assert!(validate_params(&schema, Some(&params(json!({ "level": 3 })))).is_ok());
		assert!(validate_params(&schema, Some(&params(json!({ "level": 1 })))).is_ok());
		assert!(validate_params(&schema, Some(&params(json!({ "level": 5.0 })))).is_ok());

		let err = validate_params(&schema, Some(&params(json!({ "level": 0 }))));
		assert_eq!(err, Err(ParamError::new("level", ParamViolation::BelowMin(1.0))));
		let err = validate_params(&schema, Some(&params(json!({ "level": 5.01 }))));
		assert_eq!(err, Err(ParamError::new("level", ParamViolation::AboveMax(5.0))));

		let err = validate_params(&schema, Some(&params(json!({ "level": "3" }))));
		assert_eq!(
			err,
			Err(ParamError::new("level", ParamViolation::WrongType(ParamType::Number)))
		);
	}

	#[test]
	fn test_string_enum() {
		let schema = mode_schema();

		assert!(validate_params(&schema, Some(&params(json!({ "mode": "auto" })))).is_ok());
		assert!(validate_params(&schema, Some(&params(json!({ "mode": "manual" })))).is_ok());
		// Optional and absent
		assert!(validate_params(&schema, None).is_ok());

		let err = validate_params(&schema, Some(&params(json!({ "mode": "assisted" }))));
		assert!(matches!(
			err,
			Err(ParamError { violation: ParamViolation::NotInEnum(ref allowed), .. })
				if allowed.len() == 2
		));
		// Enum match is case-sensitive
		assert!(validate_params(&schema, Some(&params(json!({ "mode": "Auto" })))).is_err());

		let err = validate_params(&schema, Some(&params(json!({ "mode": 1 }))));
		assert_eq!(err, Err(ParamError::new("mode", ParamViolation::WrongType(ParamType::String))));
	}

	#[test]
	fn test_boolean_and_passthrough_types() {
		let schema = schema(&[
			("on", ParamDef::new(ParamType::Boolean)),
			("pose", ParamDef::new(ParamType::Object).required()),
			("path", ParamDef::new(ParamType::Array)),
		]);

		assert!(validate_params(&schema, Some(&params(json!({ "on": true, "pose": 1 })))).is_ok());
		assert!(
			validate_params(&schema, Some(&params(json!({ "pose": null, "path": "x" })))).is_ok()
		);
		let err = validate_params(&schema, Some(&params(json!({ "on": "yes", "pose": {} }))));
		assert_eq!(err, Err(ParamError::new("on", ParamViolation::WrongType(ParamType::Boolean))));
		// Object/array still honor `required`
		let err = validate_params(&schema, Some(&params(json!({ "on": false }))));
		assert_eq!(err, Err(ParamError::new("pose", ParamViolation::Missing)));
	}

	#[test]
	fn test_unknown_params_are_ignored() {
		let schema = level_schema();
		let res = validate_params(&schema, Some(&params(json!({ "level": 2, "extra": "x" }))));
		assert!(res.is_ok());
		assert!(validate_params(&HashMap::new(), Some(&params(json!({ "any": 1 })))).is_ok());
	}

	#[test]
	fn test_large_and_negative_numbers() {
		let schema = schema(&[("n", ParamDef::new(ParamType::Number).range(Some(-10.0), None))]);
		assert!(validate_params(&schema, Some(&params(json!({ "n": u64::MAX })))).is_ok());
		assert!(validate_params(&schema, Some(&params(json!({ "n": -10 })))).is_ok());
		assert!(validate_params(&schema, Some(&params(json!({ "n": -10.5 })))).is_err());
	}

	#[test]
	fn test_check_definition() {
		assert!(matches!(check_definition(&Action::new("", "x")), Err(Error::InvalidAction(_))));
		assert!(matches!(check_definition(&Action::new("x", "")), Err(Error::InvalidAction(_))));
		assert!(check_definition(&Action::new("x", "X").param("m", mode_schema()["mode"].clone())).is_ok());

		let bad_enum = Action::new("x", "X")
			.param("n", ParamDef::new(ParamType::Number).one_of(["1", "2"]));
		assert!(matches!(check_definition(&bad_enum), Err(Error::InvalidAction(_))));

		let bad_range =
			Action::new("x", "X").param("s", ParamDef::new(ParamType::String).range(Some(1.0), None));
		assert!(matches!(check_definition(&bad_range), Err(Error::InvalidAction(_))));

		let inverted = Action::new("x", "X")
			.param("n", ParamDef::new(ParamType::Number).range(Some(5.0), Some(1.0)));
		assert!(matches!(check_definition(&inverted), Err(Error::InvalidAction(_))));
	}
}

// vim: ts=4
