//! Stable identifiers for checks and verdict codes.
//!
//! `check_id` is a dotted namespace whose first segment is the report category.
//! `code` is a short snake_case discriminator.

// Checks
pub const CHECK_STRUCTURE_REQUIRED_FILES: &str = "structure.required_files";
pub const CHECK_STRUCTURE_RECOMMENDED_FILES: &str = "structure.recommended_files";
pub const CHECK_STRUCTURE_README_SECTIONS: &str = "structure.readme_sections";
pub const CHECK_STRUCTURE_SYNTAX: &str = "structure.syntax";
pub const CHECK_NAMING_CONVENTION: &str = "naming.convention";
pub const CHECK_NAMING_DUPLICATES: &str = "naming.duplicates";
pub const CHECK_DESCRIPTION_REQUIRED: &str = "description.required";
pub const CHECK_TYPE_PATTERN_VALIDATION: &str = "type_pattern.validation";
pub const CHECK_VERSION_CONSTRAINTS: &str = "version.constraints";
pub const CHECK_REFERENCE_RESOLVED: &str = "reference.resolved";
pub const CHECK_REFERENCE_UNUSED_VARIABLES: &str = "reference.unused_variables";
pub const CHECK_OUTPUT_VALUE: &str = "output.value";

// Codes: structure.required_files / structure.recommended_files
pub const CODE_MISSING_REQUIRED_FILE: &str = "missing_required_file";
pub const CODE_MISSING_RECOMMENDED_FILE: &str = "missing_recommended_file";

// Codes: structure.readme_sections
pub const CODE_MISSING_README_SECTION: &str = "missing_readme_section";

// Codes: structure.syntax
pub const CODE_UNCLOSED_DELIMITER: &str = "unclosed_delimiter";
pub const CODE_UNEXPECTED_CLOSER: &str = "unexpected_closer";
pub const CODE_MISMATCHED_DELIMITER: &str = "mismatched_delimiter";
pub const CODE_UNTERMINATED_STRING: &str = "unterminated_string";
pub const CODE_UNTERMINATED_HEREDOC: &str = "unterminated_heredoc";
pub const CODE_UNTERMINATED_COMMENT: &str = "unterminated_comment";
pub const CODE_STRAY_QUOTE: &str = "stray_quote";
pub const CODE_UNCLOSED_BLOCK: &str = "unclosed_block";
pub const CODE_MALFORMED_HEADER: &str = "malformed_header";
pub const CODE_INVALID_ENCODING: &str = "invalid_encoding";

// Codes: naming.*
pub const CODE_INVALID_IDENTIFIER: &str = "invalid_identifier";
pub const CODE_DUPLICATE_DECLARATION: &str = "duplicate_declaration";

// Codes: description.required
pub const CODE_MISSING_DESCRIPTION: &str = "missing_description";

// Codes: type_pattern.validation
pub const CODE_MISSING_VALIDATION: &str = "missing_validation";
pub const CODE_IMPLAUSIBLE_VALIDATION: &str = "implausible_validation";
pub const CODE_MISSING_TYPE_CONSTRAINT: &str = "missing_type_constraint";

// Codes: version.constraints
pub const CODE_MISSING_CORE_VERSION: &str = "missing_core_version";
pub const CODE_MISSING_PROVIDER_VERSION: &str = "missing_provider_version";

// Codes: reference.*
pub const CODE_UNRESOLVED_REFERENCE: &str = "unresolved_reference";
pub const CODE_UNUSED_VARIABLE: &str = "unused_variable";

// Codes: output.value
pub const CODE_MISSING_VALUE: &str = "missing_value";
pub const CODE_LITERAL_VALUE: &str = "literal_value";
pub const CODE_UNRESOLVED_VALUE: &str = "unresolved_value";

// Shared pass code
pub const CODE_OK: &str = "ok";
