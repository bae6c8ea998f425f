use crate::rules::family::{Dialect, Family, RuleSet, apply_family};
use serde::Deserialize;

/// How much text each rule sees at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
	/// Rules run over the entire file, so calls may span lines.
	#[default]
	WholeFile,

	/// Rules run over each line independently.
	PerLine,
}

impl MatchMode {
	pub fn as_str(self) -> &'static str {
		match self {
			MatchMode::WholeFile => "whole-file",
			MatchMode::PerLine => "per-line",
		}
	}
}

/// Result of one transformation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
	/// The rewritten text.
	pub text: String,

	/// Rewrite counts per family, in family order. Families that rewrote
	/// nothing are omitted.
	pub rewrites: Vec<(Family, usize)>,
}

impl Transformation {
	/// Total number of rewrites across all families.
	pub fn total(&self) -> usize {
		self.rewrites.iter().map(|(_, count)| count).sum()
	}
}

/// Applies a rule set to file text.
///
/// Stateless between calls: one `Rewriter` serves every file in a run.
#[derive(Debug, Clone)]
pub struct Rewriter {
	rules: RuleSet,
	mode: MatchMode,
}

impl Rewriter {
	pub fn new(rules: RuleSet, mode: MatchMode) -> Self {
		Rewriter { rules, mode }
	}

	pub fn for_dialect(dialect: Dialect, mode: MatchMode) -> Self {
		Self::new(RuleSet::new(dialect), mode)
	}

	pub fn rules(&self) -> &RuleSet {
		&self.rules
	}

	pub fn mode(&self) -> MatchMode {
		self.mode
	}

	/// Transform `text`, leaving anything no rule recognizes untouched.
	pub fn transform(&self, text: &str) -> String {
		self.run(text).text
	}

	/// Transform `text` and report how many rewrites each family made.
	pub fn run(&self, text: &str) -> Transformation {
		let mut rewrites = Vec::new();

		let text = match self.mode {
			MatchMode::WholeFile => self.apply_all(text.to_string(), &mut rewrites),
			MatchMode::PerLine => text
				.split_inclusive('\n')
				.map(|line| self.apply_all(line.to_string(), &mut rewrites))
				.collect(),
		};

		Transformation { text, rewrites }
	}

	fn apply_all(&self, mut text: String, rewrites: &mut Vec<(Family, usize)>) -> String {
		for (family, rules) in self.rules.passes() {
			let (rewritten, count) = apply_family(rules, &text);
			if count > 0 {
				record(rewrites, family, count);
				text = rewritten;
			}
		}
		text
	}
}

impl Default for Rewriter {
	fn default() -> Self {
		Self::new(RuleSet::default(), MatchMode::default())
	}
}

fn record(rewrites: &mut Vec<(Family, usize)>, family: Family, count: usize) {
	match rewrites.iter_mut().find(|(f, _)| *f == family) {
		Some((_, total)) => *total += count,
		None => {
			rewrites.push((family, count));
			let order = |f: &Family| Family::ORDER.iter().position(|o| o == f);
			rewrites.sort_by_key(|(f, _)| order(f));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn junit4(text: &str) -> String {
		Rewriter::default().transform(text)
	}

	fn junit5(text: &str) -> String {
		Rewriter::for_dialect(Dialect::Junit5, MatchMode::WholeFile).transform(text)
	}

	#[test]
	fn test_scenario_empty_collection() {
		assert_eq!(junit4("assertEquals(0, myList.size());"), "assertThat(myList).isEmpty();");
	}

	#[test]
	fn test_scenario_size_with_message() {
		assert_eq!(
			junit4(r#"assertEquals("should have two items", 2, myList.size());"#),
			r#"assertThat(myList).as("should have two items").hasSize(2);"#
		);
	}

	#[test]
	fn test_scenario_tolerance() {
		assert_eq!(
			junit4("assertEquals(3.14, actualValue, 0.01);"),
			"assertThat(actualValue).isCloseTo(3.14, within(0.01));"
		);
	}

	#[test]
	fn test_scenario_true() {
		assert_eq!(
			junit4("assertTrue(result.isValid());"),
			"assertThat(result.isValid()).isTrue();"
		);
	}

	#[test]
	fn test_scenario_import() {
		assert_eq!(
			junit4("import static org.junit.Assert.assertEquals;\n"),
			"import static org.assertj.core.api.Assertions.assertThat;\n"
		);
	}

	#[test]
	fn test_zero_size_is_empty_not_has_size() {
		let out = junit4("assertEquals(0, list.size());\nassertEquals(  0,  list.size());\n");
		assert_eq!(out, "assertThat(list).isEmpty();\nassertThat(list).isEmpty();\n");
		assert!(!out.contains("hasSize(0)"));
	}

	#[test]
	fn test_identity_on_unrecognized_text() {
		let text = concat!(
			"package com.example;\n",
			"\n",
			"class FooTest {\n",
			"    @Test\n",
			"    void works() {\n",
			"        assertThat(foo).isEqualTo(bar);\n",
			"        assertThrows(IllegalStateException.class, () -> foo.run());\n",
			"        String s = \"assertEquals(a, b)\";\n",
			"    }\n",
			"}\n",
		);
		assert_eq!(junit4(text), text);
		assert_eq!(junit5(text), text);
	}

	#[test]
	fn test_empty_collection_operands() {
		assert_eq!(
			junit4("assertEquals(  0,  (new String(\"\")).size());\nassertEquals(  0,  multiParam( 1.1, param2).size());\n"),
			"assertThat((new String(\"\"))).isEmpty();\nassertThat(multiParam( 1.1, param2)).isEmpty();\n"
		);
		assert_eq!(
			junit4("assertEquals(  0,  (new String(\"  ,  \")).size());\nassertEquals(  0,  \"  ,  \".size());\n"),
			"assertThat((new String(\"  ,  \"))).isEmpty();\nassertThat(\"  ,  \").isEmpty();\n"
		);
	}

	#[test]
	fn test_has_size_operands() {
		assert_eq!(
			junit4("assertEquals(1234, myList.size());\nassertEquals(1234, (new int[1234]).size());\n"),
			"assertThat(myList).hasSize(1234);\nassertThat((new int[1234])).hasSize(1234);\n"
		);
		assert_eq!(
			junit4("assertEquals( 1234, myList(123).size());\nassertEquals( 1234, (\"12.\" + \",123\").size());\n"),
			"assertThat(myList(123)).hasSize(1234);\nassertThat((\"12.\" + \",123\")).hasSize(1234);\n"
		);
		assert_eq!(
			junit4("assertEquals( 123, multiParam(1.1, param2, hello[i]).size());\n"),
			"assertThat(multiParam(1.1, param2, hello[i])).hasSize(123);\n"
		);
	}

	#[test]
	fn test_close_to_operands() {
		assert_eq!(
			junit4("assertEquals(expected.size(), value, EPSILON);\nassertEquals( 4, (new Array(3)).size(), EPSILON);\n"),
			"assertThat(value).isCloseTo(expected.size(), within(EPSILON));\nassertThat((new Array(3)).size()).isCloseTo(4, within(EPSILON));\n"
		);
	}

	#[test]
	fn test_is_equal_to_with_commas_and_quotes_in_strings() {
		let cases = [
			(
				r#"assertEquals("34.34", StringHandling.fixFPNumberFormat("34,34"));"#,
				r#"assertThat(StringHandling.fixFPNumberFormat("34,34")).isEqualTo("34.34");"#,
			),
			(
				r#"assertEquals("123,567.34", StringHandling.fixFPNumberFormat("1,234,567.34"));"#,
				r#"assertThat(StringHandling.fixFPNumberFormat("1,234,567.34")).isEqualTo("123,567.34");"#,
			),
			(
				r#"assertEquals("123\",5\"67.34", StringHandling.fixFPNumberFormat("1.234\.567\,34"));"#,
				r#"assertThat(StringHandling.fixFPNumberFormat("1.234\.567\,34")).isEqualTo("123\",5\"67.34");"#,
			),
		];
		for (input, expected) in cases {
			assert_eq!(junit4(input), expected);
		}
	}

	#[test]
	fn test_array_equality() {
		assert_eq!(
			junit4(r#"assertArrayEquals(houses.getList(" \",123 ", "house_name"), actual);"#),
			r#"assertThat(actual).isEqualTo(houses.getList(" \",123 ", "house_name"));"#
		);
	}

	#[test]
	fn test_null_checks() {
		assert_eq!(
			junit4(r#"assertNull(calculate(abcd, ",\",123\",", 1234));"#),
			r#"assertThat(calculate(abcd, ",\",123\",", 1234)).isNull();"#
		);
		assert_eq!(junit4("assertNotNull(service);"), "assertThat(service).isNotNull();");
	}

	#[test]
	fn test_same_reference() {
		assert_eq!(junit4("assertSame(2.14, actual);"), "assertThat(actual).isSameAs(2.14);");
		assert_eq!(
			junit4("assertNotSame(original, copy);"),
			"assertThat(copy).isNotSameAs(original);"
		);
	}

	#[test]
	fn test_junit4_message_variants_anchor_on_actual() {
		let cases = [
			(r#"assertEquals("m", 0, list.size());"#, r#"assertThat(list).as("m").isEmpty();"#),
			(
				r#"assertEquals("m", 1.0, value, 0.1);"#,
				r#"assertThat(value).as("m").isCloseTo(1.0, within(0.1));"#,
			),
			(r#"assertEquals("m", expected, actual);"#, r#"assertThat(actual).as("m").isEqualTo(expected);"#),
			(
				r#"assertNotEquals("m", expected, actual);"#,
				r#"assertThat(actual).as("m").isNotEqualTo(expected);"#,
			),
			(
				r#"assertArrayEquals("m", expected, actual);"#,
				r#"assertThat(actual).as("m").isEqualTo(expected);"#,
			),
			(r#"assertNull("m", value);"#, r#"assertThat(value).as("m").isNull();"#),
			(r#"assertNotNull("m", value);"#, r#"assertThat(value).as("m").isNotNull();"#),
			(r#"assertTrue("m", flag);"#, r#"assertThat(flag).as("m").isTrue();"#),
			(r#"assertFalse("m", flag);"#, r#"assertThat(flag).as("m").isFalse();"#),
			(r#"assertSame("m", expected, actual);"#, r#"assertThat(actual).as("m").isSameAs(expected);"#),
			(
				r#"assertNotSame("m", expected, actual);"#,
				r#"assertThat(actual).as("m").isNotSameAs(expected);"#,
			),
		];
		for (input, expected) in cases {
			assert_eq!(junit4(input), expected, "input: {input}");
		}
	}

	#[test]
	fn test_message_is_carried_verbatim() {
		assert_eq!(
			junit4(r#"assertTrue("a \"quoted\", (odd) message", ok);"#),
			r#"assertThat(ok).as("a \"quoted\", (odd) message").isTrue();"#
		);
	}

	#[test]
	fn test_junit5_trailing_message() {
		let cases = [
			(r#"assertEquals(0, list.size(), "m");"#, r#"assertThat(list).as("m").isEmpty();"#),
			(r#"assertEquals(2, list.size(), "m");"#, r#"assertThat(list).as("m").hasSize(2);"#),
			(
				r#"assertEquals(1.0, value, 0.1, "m");"#,
				r#"assertThat(value).as("m").isCloseTo(1.0, within(0.1));"#,
			),
			(r#"assertEquals(expected, actual, "m");"#, r#"assertThat(actual).as("m").isEqualTo(expected);"#),
			(r#"assertTrue(flag, "m");"#, r#"assertThat(flag).as("m").isTrue();"#),
		];
		for (input, expected) in cases {
			assert_eq!(junit5(input), expected, "input: {input}");
		}
	}

	#[test]
	fn test_junit5_leading_string_is_an_operand() {
		assert_eq!(
			junit5(r#"assertEquals("12.34", StringHandling.fixFPNumberFormat("12.34"));"#),
			r#"assertThat(StringHandling.fixFPNumberFormat("12.34")).isEqualTo("12.34");"#
		);
		assert_eq!(junit5("assertEquals(12.34, 13.45, 0.1);"), "assertThat(13.45).isCloseTo(12.34, within(0.1));");
	}

	#[test]
	fn test_junit5_imports() {
		let text = concat!(
			"import static org.junit.jupiter.api.Assertions.fail;\n",
			"import static org.junit.jupiter.api.Assertions.*;\n",
			"import static org.junit.jupiter.api.Assertions...*;\n",
			"import static org.junit!jupiter.api.Assertions.*;\n",
		);
		assert_eq!(
			junit5(text),
			concat!(
				"import static org.assertj.core.api.Assertions.fail;\n",
				"import static org.assertj.core.api.Assertions.*;\n",
				"import static org.junit.jupiter.api.Assertions...*;\n",
				"import static org.junit!jupiter.api.Assertions.*;\n",
			)
		);
	}

	#[test]
	fn test_imports_are_idempotent() {
		let text = concat!(
			"import static org.junit.Assert.assertEquals;\n",
			"import static org.junit.Assert.fail;\n",
			"import static org.junit.Assert.*;\n",
		);
		let once = junit4(text);
		assert_ne!(once, text);
		assert_eq!(junit4(&once), once);
	}

	#[test]
	fn test_lookalike_imports_untouched() {
		let text = concat!(
			"import static org!junit.Assert.assertEquals;\n",
			"import static org.junit.Assert...fail;\n",
			"import static org.junit.Assert.....Test;\n",
		);
		assert_eq!(junit4(text), text);
	}

	#[test]
	fn test_whole_file_preserves_layout() {
		let text = "class T {\r\n\tvoid t() {\r\n\t\tassertNull(x);\r\n\t\tassertFalse(y);\r\n\t}\r\n}\r\n";
		assert_eq!(
			junit4(text),
			"class T {\r\n\tvoid t() {\r\n\t\tassertThat(x).isNull();\r\n\t\tassertThat(y).isFalse();\r\n\t}\r\n}\r\n"
		);
	}

	#[test]
	fn test_whole_file_handles_multi_line_calls() {
		let text = "assertEquals(\n    expected,\n    actual);\n";
		assert_eq!(junit4(text), "assertThat(actual).isEqualTo(expected);\n");
	}

	#[test]
	fn test_per_line_mode_leaves_multi_line_calls() {
		let rewriter = Rewriter::for_dialect(Dialect::Junit4, MatchMode::PerLine);
		let text = "assertEquals(\n    expected,\n    actual);\nassertNull(x);\n";
		assert_eq!(
			rewriter.transform(text),
			"assertEquals(\n    expected,\n    actual);\nassertThat(x).isNull();\n"
		);
	}

	#[test]
	fn test_per_line_and_whole_file_agree_on_single_line_calls() {
		let text = concat!(
			"import static org.junit.Assert.*;\n",
			"assertEquals(0, a.size());\n",
			"assertEquals(\"m\", 3, b.size());\n",
			"assertEquals(1.5, c, 0.5);\n",
			"assertTrue(d);\n",
		);
		let per_line = Rewriter::for_dialect(Dialect::Junit4, MatchMode::PerLine);
		assert_eq!(per_line.transform(text), junit4(text));
	}

	#[test]
	fn test_run_counts_per_family() {
		let text = concat!(
			"import static org.junit.Assert.assertEquals;\n",
			"assertEquals(0, a.size());\n",
			"assertEquals(0, b.size());\n",
			"assertTrue(c);\n",
		);
		let result = Rewriter::default().run(text);
		assert_eq!(
			result.rewrites,
			vec![
				(Family::EmptyCollection, 2),
				(Family::True, 1),
				(Family::Imports, 1)
			]
		);
		assert_eq!(result.total(), 4);
	}

	#[test]
	fn test_run_reports_nothing_for_untouched_text() {
		let result = Rewriter::default().run("int x = 1;\n");
		assert!(result.rewrites.is_empty());
		assert_eq!(result.text, "int x = 1;\n");
	}

	#[test]
	fn test_nested_same_name_call_left_for_next_run() {
		let once = junit4(r#"assertTrue("m", assertTrue(x));"#);
		assert_eq!(once, r#"assertThat(assertTrue(x)).as("m").isTrue();"#);
		assert_eq!(junit4(&once), r#"assertThat(assertThat(x).isTrue()).as("m").isTrue();"#);
	}

	#[test]
	fn test_assert_that_output_is_never_rematched() {
		let once = junit4("assertEquals(expected, actual);\nassertTrue(flag);\n");
		assert_eq!(junit4(&once), once);
	}
}
