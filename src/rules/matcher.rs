//! Call-expression scanning over Java-like source text.
//!
//! This is not a parser. It knows just enough about the host language to step
//! over string literals, char literals, text blocks and comments, and to track
//! bracket depth. That is all it takes to locate a named call and split its
//! argument list at top-level commas.

/// A call expression located in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite<'a> {
	/// Byte offset of the first character of the method name.
	pub start: usize,

	/// Byte offset just past the closing parenthesis.
	pub end: usize,

	/// Raw argument texts split at top-level commas, untrimmed.
	pub args: Vec<&'a str>,
}

impl<'a> CallSite<'a> {
	/// Arguments with surrounding whitespace removed.
	pub fn operands(&self) -> Vec<&'a str> {
		self.args.iter().map(|arg| arg.trim()).collect()
	}
}

/// Find every call to `name` outside literals and comments, in source order.
///
/// Qualified calls (`Assert.assertEquals(...)`), longer identifiers that merely
/// contain `name`, method declarations (`void name(...) {`) and calls whose
/// parenthesis never closes are all skipped. Sites may nest; callers that
/// rewrite should skip sites starting inside an already rewritten span.
pub fn find_calls<'a>(text: &'a str, name: &str) -> Vec<CallSite<'a>> {
	let bytes = text.as_bytes();
	let mut sites = Vec::new();
	let mut i = 0;

	while i < bytes.len() {
		if let Some(next) = skip_opaque(bytes, i) {
			i = next;
			continue;
		}
		if !is_ident_byte(bytes[i]) {
			i += 1;
			continue;
		}

		let start = i;
		while i < bytes.len() && is_ident_byte(bytes[i]) {
			i += 1;
		}
		if &bytes[start..i] != name.as_bytes() || (start > 0 && bytes[start - 1] == b'.') {
			continue;
		}
		if let Some(site) = call_at(text, start, i)
			&& !is_declaration(bytes, site.end)
		{
			sites.push(site);
		}
	}

	sites
}

/// Split an argument list at commas that sit outside brackets and literals.
///
/// An empty (or all-whitespace) list yields no arguments.
pub fn split_arguments(inner: &str) -> Vec<&str> {
	if inner.trim().is_empty() {
		return Vec::new();
	}

	let bytes = inner.as_bytes();
	let mut args = Vec::new();
	let mut depth = 0usize;
	let mut start = 0;
	let mut i = 0;

	while i < bytes.len() {
		if let Some(next) = skip_opaque(bytes, i) {
			i = next;
			continue;
		}
		match bytes[i] {
			b'(' | b'[' | b'{' => depth += 1,
			b')' | b']' | b'}' => depth = depth.saturating_sub(1),
			b',' if depth == 0 => {
				args.push(&inner[start..i]);
				start = i + 1;
			}
			_ => {}
		}
		i += 1;
	}
	args.push(&inner[start..]);

	args
}

/// Whether `expr` is exactly one string literal (or text block).
pub fn is_string_literal(expr: &str) -> bool {
	let bytes = expr.trim().as_bytes();
	if bytes.len() < 2 || bytes[0] != b'"' {
		return false;
	}
	let end = if bytes.starts_with(b"\"\"\"") {
		scan_text_block(bytes, 3)
	} else {
		scan_quoted(bytes, 1, b'"')
	};
	end == Ok(bytes.len())
}

/// Whether `expr` contains an operator outside brackets and literals.
///
/// Used to tell a plain postfix chain (`list.get(0).items`) apart from a
/// compound expression (`a.size() + b`).
pub fn has_top_level_operator(expr: &str) -> bool {
	let bytes = expr.as_bytes();
	let mut depth = 0usize;
	let mut i = 0;

	while i < bytes.len() {
		if let Some(next) = skip_opaque(bytes, i) {
			i = next;
			continue;
		}
		match bytes[i] {
			b'(' | b'[' | b'{' => depth += 1,
			b')' | b']' | b'}' => depth = depth.saturating_sub(1),
			b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>' | b'=' | b'!' | b'&' | b'|' | b'^'
			| b'?' | b':' | b'~' | b','
				if depth == 0 =>
			{
				return true;
			}
			_ => {}
		}
		i += 1;
	}

	false
}

fn call_at(text: &str, start: usize, name_end: usize) -> Option<CallSite<'_>> {
	let bytes = text.as_bytes();
	let open = skip_whitespace(bytes, name_end);
	if bytes.get(open) != Some(&b'(') {
		return None;
	}
	let close = matching_paren(bytes, open)?;

	Some(CallSite {
		start,
		end: close + 1,
		args: split_arguments(&text[open + 1..close]),
	})
}

fn is_declaration(bytes: &[u8], call_end: usize) -> bool {
	bytes.get(skip_whitespace(bytes, call_end)) == Some(&b'{')
}

/// Offset of the `)` closing the `(` at `open`, if brackets balance.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
	let mut depth = 0usize;
	let mut i = open;

	while i < bytes.len() {
		if let Some(next) = skip_opaque(bytes, i) {
			i = next;
			continue;
		}
		match bytes[i] {
			b'(' | b'[' | b'{' => depth += 1,
			b')' | b']' | b'}' => {
				depth = depth.checked_sub(1)?;
				if depth == 0 {
					return (bytes[i] == b')').then_some(i);
				}
			}
			_ => {}
		}
		i += 1;
	}

	None
}

/// If a literal or comment starts at `i`, return the offset just past it.
fn skip_opaque(bytes: &[u8], i: usize) -> Option<usize> {
	match bytes[i] {
		b'"' if bytes[i..].starts_with(b"\"\"\"") => {
			Some(scan_text_block(bytes, i + 3).unwrap_or_else(|cut| cut))
		}
		b'"' | b'\'' => Some(scan_quoted(bytes, i + 1, bytes[i]).unwrap_or_else(|cut| cut)),
		b'/' if bytes.get(i + 1) == Some(&b'/') => Some(
			bytes[i..]
				.iter()
				.position(|&b| b == b'\n')
				.map_or(bytes.len(), |offset| i + offset),
		),
		b'/' if bytes.get(i + 1) == Some(&b'*') => Some(
			bytes[i + 2..]
				.windows(2)
				.position(|w| w == b"*/")
				.map_or(bytes.len(), |offset| i + 2 + offset + 2),
		),
		_ => None,
	}
}

/// Offset just past the closing `quote`, or `Err` with the offset where an
/// unterminated literal gives up (end of line or end of input).
fn scan_quoted(bytes: &[u8], mut i: usize, quote: u8) -> Result<usize, usize> {
	while i < bytes.len() {
		match bytes[i] {
			b'\\' => i += 2,
			b'\n' => return Err(i),
			b if b == quote => return Ok(i + 1),
			_ => i += 1,
		}
	}
	Err(bytes.len())
}

fn scan_text_block(bytes: &[u8], mut i: usize) -> Result<usize, usize> {
	while i < bytes.len() {
		if bytes[i] == b'\\' {
			i += 2;
		} else if bytes[i..].starts_with(b"\"\"\"") {
			return Ok(i + 3);
		} else {
			i += 1;
		}
	}
	Err(bytes.len())
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
	while i < bytes.len() && bytes[i].is_ascii_whitespace() {
		i += 1;
	}
	i
}

// Non-ASCII bytes count as identifier bytes so multi-byte characters are
// never split.
fn is_ident_byte(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}
