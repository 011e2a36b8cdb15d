pub const COMMA: char = ',';
pub const DOT: char = '.';

pub const OPEN_BRACKET: char = '[';
pub const CLOSE_BRACKET: char = ']';
pub const OPEN_BRACE: char = '{';
pub const CLOSE_BRACE: char = '}';

pub const NULL_LITERAL: &str = "null";
pub const TRUE_LITERAL: &str = "true";
pub const FALSE_LITERAL: &str = "false";

pub const DOUBLE_QUOTE: char = '"';

/// Written between entries of an object or array.
pub const ENTRY_SEPARATOR: &str = ", ";
/// Written between a key and its value.
pub const KEY_SEPARATOR: &str = ": ";

pub const NAN_LITERAL: &str = "NaN";
pub const INFINITY_LITERAL: &str = "Infinity";
pub const NEG_INFINITY_LITERAL: &str = "-Infinity";

pub const NANOS_PER_SECOND: i32 = 1_000_000_000;
pub const NANOS_PER_MILLISECOND: i32 = 1_000_000;
pub const NANOS_PER_MICROSECOND: i32 = 1_000;

pub const TIMESTAMP_SUFFIX: char = 'Z';
pub const DURATION_SUFFIX: char = 's';
