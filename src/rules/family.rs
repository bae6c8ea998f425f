//! The rule table: which JUnit call shapes are recognized, in which order, and
//! what AssertJ call each one is rewritten into.

use crate::rules::matcher::{CallSite, find_calls, has_top_level_operator, is_string_literal};
use serde::Deserialize;

/// Source assertion convention being migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
	/// `org.junit.Assert`: optional message is the first argument.
	#[default]
	Junit4,

	/// `org.junit.jupiter.api.Assertions`: optional message is the last argument.
	Junit5,
}

impl Dialect {
	/// Where this dialect puts the optional failure message.
	pub fn message_slot(self) -> MessageSlot {
		match self {
			Dialect::Junit4 => MessageSlot::Leading,
			Dialect::Junit5 => MessageSlot::Trailing,
		}
	}

	/// Exact static-import lines rewritten by the import family, as
	/// `(source, target)` pairs.
	pub fn import_rewrites(self) -> &'static [(&'static str, &'static str)] {
		match self {
			Dialect::Junit4 => &[
				(
					"import static org.junit.Assert.assertEquals;",
					"import static org.assertj.core.api.Assertions.assertThat;",
				),
				(
					"import static org.junit.Assert.fail;",
					"import static org.assertj.core.api.Assertions.fail;",
				),
				(
					"import static org.junit.Assert.*;",
					"import static org.assertj.core.api.Assertions.*;",
				),
			],
			Dialect::Junit5 => &[
				(
					"import static org.junit.jupiter.api.Assertions.assertEquals;",
					"import static org.assertj.core.api.Assertions.assertThat;",
				),
				(
					"import static org.junit.jupiter.api.Assertions.fail;",
					"import static org.assertj.core.api.Assertions.fail;",
				),
				(
					"import static org.junit.jupiter.api.Assertions.*;",
					"import static org.assertj.core.api.Assertions.*;",
				),
			],
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Dialect::Junit4 => "junit4",
			Dialect::Junit5 => "junit5",
		}
	}
}

/// Position of the optional quoted message within a call's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSlot {
	/// No message argument.
	Absent,

	/// Message precedes the operands.
	Leading,

	/// Message follows the operands.
	Trailing,
}

/// One assertion kind, handled by a message variant and a plain variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
	EmptyCollection,
	Size,
	Tolerance,
	Equality,
	NotEquality,
	ArrayEquality,
	Null,
	NotNull,
	True,
	False,
	Same,
	NotSame,
	Imports,
}

impl Family {
	/// Application order. Shape-specific `assertEquals` refinements come
	/// before the generic equality catch-all, and imports come last.
	pub const ORDER: [Family; 13] = [
		Family::EmptyCollection,
		Family::Size,
		Family::Tolerance,
		Family::Equality,
		Family::NotEquality,
		Family::ArrayEquality,
		Family::Null,
		Family::NotNull,
		Family::True,
		Family::False,
		Family::Same,
		Family::NotSame,
		Family::Imports,
	];

	/// The source method and call shape, or `None` for the import family.
	pub fn call(self) -> Option<(&'static str, Shape)> {
		let call = match self {
			Family::EmptyCollection => ("assertEquals", Shape::Empty),
			Family::Size => ("assertEquals", Shape::Size),
			Family::Tolerance => ("assertEquals", Shape::CloseTo),
			Family::Equality => ("assertEquals", Shape::Compare("isEqualTo")),
			Family::NotEquality => ("assertNotEquals", Shape::Compare("isNotEqualTo")),
			Family::ArrayEquality => ("assertArrayEquals", Shape::Compare("isEqualTo")),
			Family::Null => ("assertNull", Shape::Check("isNull")),
			Family::NotNull => ("assertNotNull", Shape::Check("isNotNull")),
			Family::True => ("assertTrue", Shape::Check("isTrue")),
			Family::False => ("assertFalse", Shape::Check("isFalse")),
			Family::Same => ("assertSame", Shape::Compare("isSameAs")),
			Family::NotSame => ("assertNotSame", Shape::Compare("isNotSameAs")),
			Family::Imports => return None,
		};
		Some(call)
	}

	pub fn name(self) -> &'static str {
		match self {
			Family::EmptyCollection => "empty-collection",
			Family::Size => "size",
			Family::Tolerance => "tolerance",
			Family::Equality => "equality",
			Family::NotEquality => "not-equality",
			Family::ArrayEquality => "array-equality",
			Family::Null => "null",
			Family::NotNull => "not-null",
			Family::True => "true",
			Family::False => "false",
			Family::Same => "same",
			Family::NotSame => "not-same",
			Family::Imports => "imports",
		}
	}

	/// Example `(source, target)` pair shown in progress output.
	pub fn example(self) -> (&'static str, &'static str) {
		match self {
			Family::EmptyCollection => ("assertEquals(0, myList.size())", "assertThat(myList).isEmpty()"),
			Family::Size => (
				"assertEquals(expectedSize, myList.size())",
				"assertThat(myList).hasSize(expectedSize)",
			),
			Family::Tolerance => (
				"assertEquals(expectedDouble, actual, delta)",
				"assertThat(actual).isCloseTo(expectedDouble, within(delta))",
			),
			Family::Equality => ("assertEquals(expected, actual)", "assertThat(actual).isEqualTo(expected)"),
			Family::NotEquality => (
				"assertNotEquals(expected, actual)",
				"assertThat(actual).isNotEqualTo(expected)",
			),
			Family::ArrayEquality => (
				"assertArrayEquals(expectedArray, actual)",
				"assertThat(actual).isEqualTo(expectedArray)",
			),
			Family::Null => ("assertNull(actual)", "assertThat(actual).isNull()"),
			Family::NotNull => ("assertNotNull(actual)", "assertThat(actual).isNotNull()"),
			Family::True => ("assertTrue(logicalCondition)", "assertThat(logicalCondition).isTrue()"),
			Family::False => ("assertFalse(logicalCondition)", "assertThat(logicalCondition).isFalse()"),
			Family::Same => ("assertSame(expected, actual)", "assertThat(actual).isSameAs(expected)"),
			Family::NotSame => ("assertNotSame(expected, actual)", "assertThat(actual).isNotSameAs(expected)"),
			Family::Imports => ("JUnit static imports", "AssertJ static imports"),
		}
	}
}

/// Operand layout of a recognized call and the assertion it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
	/// `(0, x.size())` to `assertThat(x).isEmpty()`.
	Empty,

	/// `(n, x.size())` to `assertThat(x).hasSize(n)`.
	Size,

	/// `(expected, actual, delta)` to
	/// `assertThat(actual).isCloseTo(expected, within(delta))`.
	CloseTo,

	/// `(expected, actual)` to `assertThat(actual).<assertion>(expected)`.
	Compare(&'static str),

	/// `(actual)` to `assertThat(actual).<assertion>()`.
	Check(&'static str),
}

impl Shape {
	/// Number of operands, not counting a message.
	pub fn arity(self) -> usize {
		match self {
			Shape::Empty | Shape::Size | Shape::Compare(_) => 2,
			Shape::CloseTo => 3,
			Shape::Check(_) => 1,
		}
	}

	/// Build `(anchor, assertion)` from trimmed operands, or `None` when the
	/// operands do not fit this shape.
	fn produce<'a>(self, operands: &[&'a str]) -> Option<(&'a str, String)> {
		match (self, operands) {
			(Shape::Empty, &[count, sized]) => {
				let anchor = size_receiver(sized)?;
				is_zero(count).then(|| (anchor, "isEmpty()".to_string()))
			}
			(Shape::Size, &[count, sized]) => {
				let anchor = size_receiver(sized)?;
				is_int_literal(count).then(|| (anchor, format!("hasSize({count})")))
			}
			(Shape::CloseTo, &[expected, actual, delta]) => {
				if operands.iter().any(|op| is_string_literal(op)) {
					return None;
				}
				Some((actual, format!("isCloseTo({expected}, within({delta}))")))
			}
			(Shape::Compare(assertion), &[expected, actual]) => {
				Some((actual, format!("{assertion}({expected})")))
			}
			(Shape::Check(assertion), &[actual]) => Some((actual, format!("{assertion}()"))),
			_ => None,
		}
	}
}

/// Receiver of a trailing `.size()` call, when `expr` is a plain postfix chain.
fn size_receiver(expr: &str) -> Option<&str> {
	let receiver = expr.strip_suffix(".size()")?.trim_end();
	(!receiver.is_empty() && !has_top_level_operator(receiver)).then_some(receiver)
}

fn is_int_literal(text: &str) -> bool {
	text.starts_with(|c: char| c.is_ascii_digit())
		&& text.chars().all(|c| c.is_ascii_digit() || c == '_')
}

fn is_zero(text: &str) -> bool {
	is_int_literal(text) && text.chars().all(|c| c == '0' || c == '_')
}

/// A rule rewriting calls to one JUnit method of one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRule {
	pub family: Family,
	pub method: &'static str,
	pub message: MessageSlot,
	pub shape: Shape,
}

impl CallRule {
	/// Rewrite a single call site, or `None` if this rule does not apply.
	pub fn rewrite(&self, site: &CallSite) -> Option<String> {
		let operands = site.operands();
		if operands.iter().any(|op| op.is_empty()) {
			return None;
		}

		let (message, operands) = self.split_message(&operands)?;
		let (anchor, assertion) = self.shape.produce(operands)?;

		let annotation = message.map(|m| format!(".as({m})")).unwrap_or_default();
		Some(format!("assertThat({anchor}){annotation}.{assertion}"))
	}

	fn split_message<'o, 'a>(
		&self,
		operands: &'o [&'a str],
	) -> Option<(Option<&'a str>, &'o [&'a str])> {
		let arity = self.shape.arity();
		match self.message {
			MessageSlot::Absent => (operands.len() == arity).then_some((None, operands)),
			MessageSlot::Leading if operands.len() == arity + 1 => {
				let (message, rest) = operands.split_first()?;
				is_string_literal(message).then_some((Some(*message), rest))
			}
			MessageSlot::Trailing if operands.len() == arity + 1 => {
				let (message, rest) = operands.split_last()?;
				is_string_literal(message).then_some((Some(*message), rest))
			}
			_ => None,
		}
	}

	/// Rewrite every matching call in `text`. Returns the new text and the
	/// number of calls rewritten.
	pub fn apply(&self, text: &str) -> (String, usize) {
		apply_calls(&[self], text)
	}
}

/// Rewrite each call site with the first rule that accepts it.
///
/// All rules target the same method. A site nested inside a call that was
/// just rewritten is left as is.
fn apply_calls(rules: &[&CallRule], text: &str) -> (String, usize) {
	let Some(first) = rules.first() else {
		return (text.to_string(), 0);
	};

	let mut out = String::with_capacity(text.len());
	let mut cursor = 0;
	let mut count = 0;

	for site in find_calls(text, first.method) {
		if site.start < cursor {
			continue;
		}
		if let Some(replacement) = rules.iter().find_map(|rule| rule.rewrite(&site)) {
			out.push_str(&text[cursor..site.start]);
			out.push_str(&replacement);
			cursor = site.end;
			count += 1;
		}
	}
	out.push_str(&text[cursor..]);

	(out, count)
}

/// Exact-line rewrite of one static import statement.
///
/// Indentation, trailing whitespace and line endings are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRule {
	pub from: &'static str,
	pub to: &'static str,
}

impl ImportRule {
	pub fn apply(&self, text: &str) -> (String, usize) {
		let mut out = String::with_capacity(text.len());
		let mut count = 0;

		for line in text.split_inclusive('\n') {
			let content = line.trim_end();
			let body = content.trim_start();
			if body == self.from {
				let indent = &content[..content.len() - body.len()];
				out.push_str(indent);
				out.push_str(self.to);
				out.push_str(&line[content.len()..]);
				count += 1;
			} else {
				out.push_str(line);
			}
		}

		(out, count)
	}
}

/// A single entry in the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteRule {
	Call(CallRule),
	Import(ImportRule),
}

impl RewriteRule {
	pub fn family(&self) -> Family {
		match self {
			RewriteRule::Call(rule) => rule.family,
			RewriteRule::Import(_) => Family::Imports,
		}
	}

}

/// Apply the rules of one family as a single pass.
///
/// Call variants share one scan, so a call rewritten by the message variant
/// shields the calls nested in it from the plain variant. Import rewrites run
/// line by line, one after the other.
pub fn apply_family(rules: &[RewriteRule], text: &str) -> (String, usize) {
	let calls: Vec<&CallRule> = rules
		.iter()
		.filter_map(|rule| match rule {
			RewriteRule::Call(call) => Some(call),
			RewriteRule::Import(_) => None,
		})
		.collect();
	let (mut text, mut count) = apply_calls(&calls, text);

	for rule in rules {
		if let RewriteRule::Import(import) = rule {
			let (rewritten, rewrites) = import.apply(&text);
			text = rewritten;
			count += rewrites;
		}
	}

	(text, count)
}

/// Ordered rule table for one dialect.
///
/// Families follow [`Family::ORDER`]. Inside every call family the message
/// variant precedes the plain variant, otherwise the plain variant would take
/// a quoted message as its first operand.
#[derive(Debug, Clone)]
pub struct RuleSet {
	dialect: Dialect,
	rules: Vec<RewriteRule>,
}

impl RuleSet {
	pub fn new(dialect: Dialect) -> Self {
		let mut rules = Vec::new();

		for family in Family::ORDER {
			match family.call() {
				Some((method, shape)) => {
					for message in [dialect.message_slot(), MessageSlot::Absent] {
						rules.push(RewriteRule::Call(CallRule {
							family,
							method,
							message,
							shape,
						}));
					}
				}
				None => {
					for &(from, to) in dialect.import_rewrites() {
						rules.push(RewriteRule::Import(ImportRule { from, to }));
					}
				}
			}
		}

		RuleSet { dialect, rules }
	}

	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	pub fn rules(&self) -> &[RewriteRule] {
		&self.rules
	}

	/// Rules grouped by family, in application order.
	pub fn passes(&self) -> impl Iterator<Item = (Family, &[RewriteRule])> {
		self.rules
			.chunk_by(|a, b| a.family() == b.family())
			.map(|rules| (rules[0].family(), rules))
	}

	/// Families in application order, each listed once.
	pub fn families(&self) -> Vec<Family> {
		self.passes().map(|(family, _)| family).collect()
	}
}

impl Default for RuleSet {
	fn default() -> Self {
		Self::new(Dialect::default())
	}
}

/// Printed after a run; these follow-ups are not text transformations.
pub const IMPORT_REMINDER: &str = "\
isCloseTo assertions need `import static org.assertj.core.api.Assertions.within;` to be added by hand.
Unused JUnit imports are left in place; remove them with your IDE's organize-imports action.";
