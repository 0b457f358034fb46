//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after configuration examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a verdict.
    pub before: &'static str,
    /// Configuration that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_STRUCTURE_REQUIRED_FILES => Some(explain_required_files()),
        ids::CHECK_STRUCTURE_RECOMMENDED_FILES => Some(explain_recommended_files()),
        ids::CHECK_STRUCTURE_README_SECTIONS => Some(explain_readme_sections()),
        ids::CHECK_STRUCTURE_SYNTAX => Some(explain_syntax()),
        ids::CHECK_NAMING_CONVENTION => Some(explain_naming_convention()),
        ids::CHECK_NAMING_DUPLICATES => Some(explain_duplicates()),
        ids::CHECK_DESCRIPTION_REQUIRED => Some(explain_description()),
        ids::CHECK_TYPE_PATTERN_VALIDATION => Some(explain_type_pattern()),
        ids::CHECK_VERSION_CONSTRAINTS => Some(explain_version_constraints()),
        ids::CHECK_REFERENCE_RESOLVED => Some(explain_reference_resolved()),
        ids::CHECK_REFERENCE_UNUSED_VARIABLES => Some(explain_unused_variables()),
        ids::CHECK_OUTPUT_VALUE => Some(explain_output_value()),

        // Codes
        ids::CODE_MISSING_REQUIRED_FILE => Some(explain_required_files()),
        ids::CODE_MISSING_RECOMMENDED_FILE => Some(explain_recommended_files()),
        ids::CODE_MISSING_README_SECTION => Some(explain_readme_sections()),
        ids::CODE_UNCLOSED_DELIMITER => Some(syntax_code("Unclosed delimiter")),
        ids::CODE_UNEXPECTED_CLOSER => Some(syntax_code("Unexpected closing delimiter")),
        ids::CODE_MISMATCHED_DELIMITER => Some(syntax_code("Mismatched delimiter")),
        ids::CODE_UNTERMINATED_STRING => Some(syntax_code("Unterminated string literal")),
        ids::CODE_UNTERMINATED_HEREDOC => Some(syntax_code("Unterminated heredoc")),
        ids::CODE_UNTERMINATED_COMMENT => Some(syntax_code("Unterminated block comment")),
        ids::CODE_STRAY_QUOTE => Some(syntax_code("Stray single quote")),
        ids::CODE_UNCLOSED_BLOCK => Some(explain_unclosed_block()),
        ids::CODE_MALFORMED_HEADER => Some(explain_malformed_header()),
        ids::CODE_INVALID_ENCODING => Some(explain_invalid_encoding()),
        ids::CODE_INVALID_IDENTIFIER => Some(explain_naming_convention()),
        ids::CODE_DUPLICATE_DECLARATION => Some(explain_duplicates()),
        ids::CODE_MISSING_DESCRIPTION => Some(explain_description()),
        ids::CODE_MISSING_VALIDATION => Some(explain_type_pattern()),
        ids::CODE_IMPLAUSIBLE_VALIDATION => Some(explain_implausible_validation()),
        ids::CODE_MISSING_TYPE_CONSTRAINT => Some(explain_missing_type_constraint()),
        ids::CODE_MISSING_CORE_VERSION => Some(explain_missing_core_version()),
        ids::CODE_MISSING_PROVIDER_VERSION => Some(explain_missing_provider_version()),
        ids::CODE_UNRESOLVED_REFERENCE => Some(explain_reference_resolved()),
        ids::CODE_UNUSED_VARIABLE => Some(explain_unused_variables()),
        ids::CODE_MISSING_VALUE => Some(explain_missing_value()),
        ids::CODE_LITERAL_VALUE => Some(explain_literal_value()),
        ids::CODE_UNRESOLVED_VALUE => Some(explain_unresolved_value()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_STRUCTURE_REQUIRED_FILES,
        ids::CHECK_STRUCTURE_RECOMMENDED_FILES,
        ids::CHECK_STRUCTURE_README_SECTIONS,
        ids::CHECK_STRUCTURE_SYNTAX,
        ids::CHECK_NAMING_CONVENTION,
        ids::CHECK_NAMING_DUPLICATES,
        ids::CHECK_DESCRIPTION_REQUIRED,
        ids::CHECK_TYPE_PATTERN_VALIDATION,
        ids::CHECK_VERSION_CONSTRAINTS,
        ids::CHECK_REFERENCE_RESOLVED,
        ids::CHECK_REFERENCE_UNUSED_VARIABLES,
        ids::CHECK_OUTPUT_VALUE,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MISSING_REQUIRED_FILE,
        ids::CODE_MISSING_RECOMMENDED_FILE,
        ids::CODE_MISSING_README_SECTION,
        ids::CODE_UNCLOSED_DELIMITER,
        ids::CODE_UNEXPECTED_CLOSER,
        ids::CODE_MISMATCHED_DELIMITER,
        ids::CODE_UNTERMINATED_STRING,
        ids::CODE_UNTERMINATED_HEREDOC,
        ids::CODE_UNTERMINATED_COMMENT,
        ids::CODE_STRAY_QUOTE,
        ids::CODE_UNCLOSED_BLOCK,
        ids::CODE_MALFORMED_HEADER,
        ids::CODE_INVALID_ENCODING,
        ids::CODE_INVALID_IDENTIFIER,
        ids::CODE_DUPLICATE_DECLARATION,
        ids::CODE_MISSING_DESCRIPTION,
        ids::CODE_MISSING_VALIDATION,
        ids::CODE_IMPLAUSIBLE_VALIDATION,
        ids::CODE_MISSING_TYPE_CONSTRAINT,
        ids::CODE_MISSING_CORE_VERSION,
        ids::CODE_MISSING_PROVIDER_VERSION,
        ids::CODE_UNRESOLVED_REFERENCE,
        ids::CODE_UNUSED_VARIABLE,
        ids::CODE_MISSING_VALUE,
        ids::CODE_LITERAL_VALUE,
        ids::CODE_UNRESOLVED_VALUE,
    ]
}

// --- Structure ---

fn explain_required_files() -> Explanation {
    Explanation {
        title: "Required Files",
        description: "\
Every module must contain the conventional set of files. By default these are
`main.tf`, `variables.tf`, `outputs.tf` and `versions.tf`. Tooling and reviewers
rely on finding declarations in predictable places.",
        remediation: "\
Create the missing file in the module root. An empty `outputs.tf` is acceptable
when the module has no outputs yet.

The set is configurable with `required_files` in modguard.toml or
`--required-file` on the command line.",
        examples: ExamplePair {
            before: "module/\n  main.tf",
            after: "module/\n  main.tf\n  variables.tf\n  outputs.tf\n  versions.tf",
        },
    }
}

fn explain_recommended_files() -> Explanation {
    Explanation {
        title: "Recommended Files",
        description: "\
Modules intended for reuse should ship a README and usage examples. A missing
recommended entry produces a warning, never a failure.",
        remediation: "\
Add a `README.md` describing inputs and outputs, an `examples/` directory
containing at least one calling configuration, and a `.gitignore` that keeps
`.terraform/` and state files out of version control.",
        examples: ExamplePair {
            before: "module/\n  main.tf",
            after: "module/\n  .gitignore\n  README.md\n  examples/basic/main.tf\n  main.tf",
        },
    }
}

fn explain_readme_sections() -> Explanation {
    Explanation {
        title: "README Sections",
        description: "\
A module README should tell callers how to use the module and what it needs
before it can be applied. The README is searched for a Markdown heading naming
each expected section; by default `Usage` and `Requirements` (or
`Prerequisites`). A missing section warns. No verdicts are produced when the
README itself is absent; `structure.recommended_files` reports that.",
        remediation: "\
Add the missing heading with a short body. The expected sections are
configurable with `[[readme_sections]]` in modguard.toml.",
        examples: ExamplePair {
            before: "# vpc\n\nCreates a VPC.",
            after: "# vpc\n\nCreates a VPC.\n\n## Requirements\n\n- Terraform >= 1.5\n\n## Usage\n\n    module \"vpc\" { source = \"./vpc\" }",
        },
    }
}

fn explain_syntax() -> Explanation {
    Explanation {
        title: "Lexical Balance",
        description: "\
The scanner checks that braces, brackets, parentheses, quotes, heredocs and
block comments are balanced. Each anomaly is reported with its line. Scanning
continues after an anomaly, so one run reports all of them.",
        remediation: "\
Fix the reported delimiter. Editors with bracket matching, or `terraform fmt`,
help locate the mismatch.",
        examples: ExamplePair {
            before: r#"resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
  tags = {
    Name = "main"
}"#,
            after: r#"resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
  tags = {
    Name = "main"
  }
}"#,
        },
    }
}

fn syntax_code(title: &'static str) -> Explanation {
    let mut exp = explain_syntax();
    exp.title = title;
    exp
}

fn explain_unclosed_block() -> Explanation {
    Explanation {
        title: "Unclosed Declaration Block",
        description: "\
A declaration header opened a block whose closing brace never appears before
end of file. The declaration is excluded from the model rather than truncated,
so later checks do not see a partial body.",
        remediation: "Close the block. The reported line is the declaration header.",
        examples: ExamplePair {
            before: r#"variable "region" {
  type = string
"#,
            after: r#"variable "region" {
  type = string
}"#,
        },
    }
}

fn explain_invalid_encoding() -> Explanation {
    Explanation {
        title: "Invalid UTF-8",
        description: "\
Configuration files must be UTF-8. A file with invalid byte sequences is still
scanned, with each bad sequence replaced by U+FFFD, and the first bad position
is reported so the rest of the module is validated normally.",
        remediation: "\
Re-save the file as UTF-8. Latin-1 characters in descriptions are the usual
cause.",
        examples: ExamplePair {
            before: "description = \"caf\\xe9 subnet\"  # Latin-1 byte",
            after: "description = \"café subnet\"",
        },
    }
}

fn explain_malformed_header() -> Explanation {
    Explanation {
        title: "Malformed Declaration Header",
        description: "\
A declaration header has the wrong number of labels. `resource` and `data`
take a type and a name; `variable`, `output`, `module` and `provider` take a
name; `locals` and `terraform` take none. The block is excluded from the model.",
        remediation: "Supply the missing label or remove the extra one.",
        examples: ExamplePair {
            before: r#"resource "aws_vpc" {
  cidr_block = var.vpc_cidr
}"#,
            after: r#"resource "aws_vpc" "main" {
  cidr_block = var.vpc_cidr
}"#,
        },
    }
}

// --- Naming ---

fn explain_naming_convention() -> Explanation {
    Explanation {
        title: "Naming Convention",
        description: "\
Declaration names must match the configured pattern. The default allows
lowercase letters, digits, underscores and hyphens, and forbids a leading
digit: `^[a-z_][a-z0-9_-]*$`.",
        remediation: "\
Rename the declaration and update every reference to it. Use `moved` blocks
for resources already in state.",
        examples: ExamplePair {
            before: r#"variable "VPC_CIDR" {
  type = string
}"#,
            after: r#"variable "vpc_cidr" {
  type = string
}"#,
        },
    }
}

fn explain_duplicates() -> Explanation {
    Explanation {
        title: "Duplicate Declaration",
        description: "\
The same kind and name is declared more than once in the module. References
resolve to the first occurrence; the others are dead weight or a mistake.
Each duplicated name yields exactly one verdict.",
        remediation: "Remove or rename the extra declaration.",
        examples: ExamplePair {
            before: r#"variable "region" { type = string }
variable "region" { type = string }"#,
            after: r#"variable "region" { type = string }"#,
        },
    }
}

// --- Description ---

fn explain_description() -> Explanation {
    Explanation {
        title: "Description Required",
        description: "\
Variables and outputs are the public interface of a module and must carry a
non-empty `description`. Resources are exempt.",
        remediation: "Add a `description` attribute explaining the purpose and expected format.",
        examples: ExamplePair {
            before: r#"variable "instance_type" {
  type = string
}"#,
            after: r#"variable "instance_type" {
  description = "EC2 instance size for the web tier"
  type        = string
}"#,
        },
    }
}

// --- Type-pattern ---

fn explain_type_pattern() -> Explanation {
    Explanation {
        title: "Type-Pattern Validation",
        description: "\
Variables whose name places them in a known category (CIDR, region, instance
type, AMI, environment, name/prefix, boolean, collection) should carry a
`validation` block whose condition references the variable and uses a check
appropriate to the category. Missing validation is a warning.

The category table is configurable with `[[type_patterns]]` in modguard.toml.",
        remediation: "Add a `validation` block with a condition suitable for the category.",
        examples: ExamplePair {
            before: r#"variable "vpc_cidr" {
  description = "VPC CIDR block"
  type        = string
}"#,
            after: r#"variable "vpc_cidr" {
  description = "VPC CIDR block"
  type        = string

  validation {
    condition     = can(cidrhost(var.vpc_cidr, 0))
    error_message = "Must be a valid IPv4 CIDR block."
  }
}"#,
        },
    }
}

fn explain_implausible_validation() -> Explanation {
    Explanation {
        title: "Implausible Validation",
        description: "\
A validation condition exists but does not look like a check for the
variable's category. A CIDR variable guarded only by `length(var.x) > 0`
accepts any non-empty string.",
        remediation: "Replace the condition with a category-specific check.",
        examples: ExamplePair {
            before: r#"validation {
  condition     = length(var.vpc_cidr) > 0
  error_message = "Required."
}"#,
            after: r#"validation {
  condition     = can(cidrhost(var.vpc_cidr, 0))
  error_message = "Must be a valid IPv4 CIDR block."
}"#,
        },
    }
}

fn explain_missing_type_constraint() -> Explanation {
    Explanation {
        title: "Missing Type Constraint",
        description: "\
Boolean and collection variables are validated by their `type` constraint
rather than a condition. A variable in these categories without a matching
`type` accepts any value.",
        remediation: "\
Declare the type explicitly, for example `type = bool` or `type = list(string)`.",
        examples: ExamplePair {
            before: r#"variable "enable_nat_gateway" {
  description = "Create a NAT gateway"
  default     = true
}"#,
            after: r#"variable "enable_nat_gateway" {
  description = "Create a NAT gateway"
  type        = bool
  default     = true
}"#,
        },
    }
}

// --- Version ---

fn explain_version_constraints() -> Explanation {
    Explanation {
        title: "Version Constraints",
        description: "\
The versions file must pin a minimum version of the core tool and of every
provider the module uses. Unpinned providers float to whatever release is
newest at init time. A constraint counts as a pin when one of its clauses uses
`>=`, `>`, `~>`, `=` or a bare version; `< 2.0` alone sets no minimum.",
        remediation: "\
Add a `terraform` block to `versions.tf` with `required_version` and a
`required_providers` entry carrying a `version` for each provider.",
        examples: ExamplePair {
            before: r#"terraform {
  required_providers {
    aws = { source = "hashicorp/aws" }
  }
}"#,
            after: r#"terraform {
  required_version = ">= 1.5.0"

  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = ">= 5.0"
    }
  }
}"#,
        },
    }
}

fn explain_missing_core_version() -> Explanation {
    let mut exp = explain_version_constraints();
    exp.title = "Missing Core Version Constraint";
    exp
}

fn explain_missing_provider_version() -> Explanation {
    let mut exp = explain_version_constraints();
    exp.title = "Missing Provider Version Constraint";
    exp
}

// --- Reference ---

fn explain_reference_resolved() -> Explanation {
    Explanation {
        title: "Unresolved Reference",
        description: "\
An expression references a variable, local, module, data source or resource
that is not declared in the scanned directory. This is a warning because
references may legitimately point outside the module. References to resource
types in a configured provider namespace are classified as external and not
reported.",
        remediation: "Declare the missing entity or fix the typo in the reference.",
        examples: ExamplePair {
            before: r#"resource "aws_subnet" "a" {
  vpc_id = aws_vpc.mian.id
}"#,
            after: r#"resource "aws_subnet" "a" {
  vpc_id = aws_vpc.main.id
}"#,
        },
    }
}

fn explain_unused_variables() -> Explanation {
    Explanation {
        title: "Unused Variable",
        description: "\
A variable is declared but never referenced by any declaration other than its
own validation conditions. Callers may set it and expect an effect.",
        remediation: "Remove the variable or wire it into the resources that need it.",
        examples: ExamplePair {
            before: r#"variable "legacy_flag" {
  description = "No longer used"
  type        = bool
}"#,
            after: "# variable removed",
        },
    }
}

// --- Output ---

fn explain_output_value() -> Explanation {
    Explanation {
        title: "Output Value",
        description: "\
Every output must have a `value` that references something the module
declares. An output holding a literal constant, or pointing only at
undeclared entities, exposes nothing of the module.",
        remediation: "\
Point the output at a resource attribute, data source, local or module output.",
        examples: ExamplePair {
            before: r#"output "vpc_id" {
  description = "VPC id"
  value       = "vpc-123456"
}"#,
            after: r#"output "vpc_id" {
  description = "VPC id"
  value       = aws_vpc.main.id
}"#,
        },
    }
}

fn explain_missing_value() -> Explanation {
    let mut exp = explain_output_value();
    exp.title = "Output Without Value";
    exp
}

fn explain_literal_value() -> Explanation {
    let mut exp = explain_output_value();
    exp.title = "Output With Literal Value";
    exp
}

fn explain_unresolved_value() -> Explanation {
    let mut exp = explain_output_value();
    exp.title = "Output With Unresolved Value";
    exp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown.check").is_none());
        assert!(lookup_explanation("unknown_code").is_none());
    }

    #[test]
    fn all_check_ids_are_valid() {
        for id in all_check_ids() {
            assert!(
                lookup_explanation(id).is_some(),
                "check_id {} should be in registry",
                id
            );
        }
    }

    #[test]
    fn all_codes_are_valid() {
        for code in all_codes() {
            assert!(
                lookup_explanation(code).is_some(),
                "code {} should be in registry",
                code
            );
        }
    }

    #[test]
    fn syntax_codes_keep_their_own_title() {
        let exp = lookup_explanation(ids::CODE_STRAY_QUOTE).expect("registered");
        assert_eq!(exp.title, "Stray single quote");
        assert!(exp.remediation.contains("delimiter"));
    }

    #[test]
    fn registry_sizes() {
        assert_eq!(all_check_ids().len(), 12);
        assert_eq!(all_codes().len(), 26);
    }

    #[test]
    fn check_ids_are_namespaced_by_category() {
        for id in all_check_ids() {
            let (prefix, rest) = id.split_once('.').expect("dotted id");
            assert!(!prefix.is_empty() && !rest.is_empty());
        }
    }
}
