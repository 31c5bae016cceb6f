use module_spec::{ModuleSpec, Violation, VisibilityMap};

/// Controls how much detail the reports print.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Summary lines and violations only.
    Clean,
    /// Also list every entry with its order and dependency.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

pub struct ReportPresenter {
    verbosity: Verbosity,
}

impl ReportPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn show_header(&self, spec: &ModuleSpec) {
        println!("Module: {} ({} entries)", spec.title, spec.fields.len());
        if self.verbosity.is_verbose() {
            if let Some(description) = &spec.description {
                println!("Description: {}", description);
            }
            self.print_entries(spec);
        }
    }

    fn print_entries(&self, spec: &ModuleSpec) {
        println!("Entries:");
        for record in spec.to_records() {
            let mut line = format!(
                " {}. {} -> {}",
                record.order, record.entry.id, record.entry.field_id
            );
            if record.entry.required {
                line.push_str(" [required]");
            }
            if let Some(dependency) = &record.entry.dependency {
                line.push_str(&format!(
                    " (when {} {} '{}')",
                    dependency.parent_field_entry_id,
                    dependency.operator.as_str(),
                    dependency.comparison_value
                ));
            }
            println!("{}", line);
        }
    }

    pub fn show_violations(&self, violations: &[Violation]) {
        if violations.is_empty() {
            println!("Validation result: valid");
            return;
        }
        println!("Validation result: invalid");
        println!("Violations:");
        for violation in violations {
            println!(
                "  #{} {} - {:?}: {}",
                violation.entry_index + 1,
                violation.entry_id,
                violation.kind,
                violation.message
            );
        }
    }

    pub fn show_visibility(
        &self,
        visibility: &VisibilityMap,
        spec: &ModuleSpec,
        required: &[String],
    ) {
        println!("Active entries:");
        for entry in &spec.fields {
            let active = visibility.get(&entry.id).copied().unwrap_or(false);
            if !active && !self.verbosity.is_verbose() {
                continue;
            }
            let state = if active { "active" } else { "hidden" };
            println!("  {} ({})", entry.id, state);
        }
        if required.is_empty() {
            println!("Required entries: none");
        } else {
            println!("Required entries: {}", required.join(", "));
        }
    }
}
