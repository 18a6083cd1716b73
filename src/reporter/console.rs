//! Console reporter with colored output

use crate::analyzer::{AggregateStats, Criterion, ScoreCalculator};
use crate::marketplace::{MarketplaceProfile, ProfileRegistry};
use crate::{AuditedListing, Diagnostic, Grade, Severity};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter<'r> {
    /// Profiles for weights and display names
    registry: &'r ProfileRegistry,
    /// Whether to show verbose output
    verbose: bool,
}

impl<'r> ConsoleReporter<'r> {
    /// Create a new console reporter
    pub fn new(registry: &'r ProfileRegistry) -> Self {
        Self {
            registry,
            verbose: false,
        }
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single audit
    pub fn report(&self, audited: &AuditedListing) {
        let profile = self.registry.registered_profile(&audited.result.marketplace);

        self.print_header(audited, profile);
        self.print_score(audited);
        if let Some(profile) = profile {
            self.print_breakdown(audited, profile);
        }
        if !audited.result.validation.is_empty() {
            self.print_diagnostics(&audited.result.validation);
        }
        if let Some(profile) = profile {
            self.print_recommendations(audited, profile);
        }
        println!();
    }

    /// Report multiple audits with summary
    pub fn report_many(&self, audited: &[AuditedListing], stats: &AggregateStats) {
        for listing in audited {
            self.report(listing);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, audited: &AuditedListing, delta: &str) {
        let result = &audited.result;
        println!(
            "{} [{}]: {} ({}){}",
            audited.path.display(),
            result.marketplace,
            result.score,
            self.colorize_grade(&result.grade()),
            delta
        );
    }

    /// Registered marketplaces with shape and weights
    pub fn report_marketplaces(&self, include_disabled: bool) {
        for (profile, enabled) in self.registry.profiles() {
            if !enabled && !include_disabled {
                continue;
            }
            let status = if enabled {
                "enabled".green()
            } else {
                "disabled".dimmed()
            };
            println!();
            println!("{} ({}) {}", profile.display_name.bold(), profile.id, status);

            println!("   {}", "Fields:".bold());
            for spec in &profile.listing_shape {
                let limit = spec
                    .max_length
                    .map(|max| format!("max {}", max))
                    .unwrap_or_else(|| "no limit".to_string());
                let required = if spec.required { "required" } else { "optional" };
                println!(
                    "   {:<18} {:<9} {:<9} {}",
                    spec.name.as_str(),
                    required,
                    limit,
                    spec.description.dimmed()
                );
            }

            println!("   {}", "Scoring weights:".bold());
            for weighted in &profile.scoring_weights {
                println!(
                    "   {:<18} {:>3.0}%",
                    weighted.criterion,
                    weighted.weight * 100.0
                );
            }

            if !profile.restricted_claims.is_empty() {
                let claims: Vec<&str> = profile.restricted_claims.iter().map(|c| c.label()).collect();
                println!("   {} {}", "Restricted:".bold(), claims.join(", "));
            }
        }
        println!();
    }

    fn print_header(&self, audited: &AuditedListing, profile: Option<&MarketplaceProfile>) {
        println!();
        println!(
            "{}",
            format!("📋 Listing Audit: {}", audited.path.display()).bold()
        );
        let marketplace = profile
            .map(|p| format!("{} ({})", p.display_name, p.id))
            .unwrap_or_else(|| audited.result.marketplace.clone());
        println!(
            "   Marketplace: {} | Errors: {} | Warnings: {}",
            marketplace,
            audited.result.count(Severity::Error),
            audited.result.count(Severity::Warning)
        );
        println!();
    }

    fn print_score(&self, audited: &AuditedListing) {
        let grade = audited.result.grade();
        let grade_str = self.colorize_grade(&grade);
        let score_bar = self.create_score_bar(audited.result.score);

        println!("   Score: {} {}", score_bar, grade_str.bold());
        println!("   {}", ScoreCalculator::grade_description(grade).dimmed());
        println!();
    }

    fn print_breakdown(&self, audited: &AuditedListing, profile: &MarketplaceProfile) {
        println!("   {}", "Score Breakdown:".bold());

        for weighted in &profile.scoring_weights {
            let Some(score) = audited.result.breakdown.get(&weighted.criterion) else {
                continue;
            };
            let percent = (score.value * 100.0).round() as u8;
            let bar = self.create_mini_bar(percent);
            let score_str = format!("{:>3}%", percent);
            let colored_score = if percent >= 80 {
                score_str.green()
            } else if percent >= 60 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            let label = Criterion::from_name(&weighted.criterion)
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| weighted.criterion.clone());
            println!(
                "   {} {} {} (weight {:.0}%, contributes {:.1})",
                bar,
                colored_score,
                label,
                weighted.weight * 100.0,
                ScoreCalculator::contribution(weighted.weight, score.value)
            );
        }
        println!();
    }

    fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
        println!("   {}", "Diagnostics:".bold());

        let by_severity = |severity: Severity| -> Vec<&Diagnostic> {
            diagnostics.iter().filter(|d| d.severity == severity).collect()
        };
        let infos = by_severity(Severity::Info);

        for diagnostic in by_severity(Severity::Error) {
            self.print_diagnostic(diagnostic);
        }
        for diagnostic in by_severity(Severity::Warning) {
            self.print_diagnostic(diagnostic);
        }

        // Only show info notes in verbose mode or if there are few in total
        if self.verbose || diagnostics.len() <= 5 {
            for diagnostic in infos {
                self.print_diagnostic(diagnostic);
            }
        } else if !infos.is_empty() {
            println!(
                "   {} {} additional notes (use --verbose to show)",
                "ℹ".blue(),
                infos.len()
            );
        }

        println!();
    }

    fn print_diagnostic(&self, diagnostic: &Diagnostic) {
        let icon = match diagnostic.severity {
            Severity::Error => "✗".red(),
            Severity::Warning => "⚠".yellow(),
            Severity::Info => "ℹ".blue(),
        };

        let field = diagnostic
            .field
            .map(|f| f.as_str())
            .unwrap_or("listing");
        println!(
            "   {} {} [{}] {}",
            icon,
            field.dimmed(),
            diagnostic.code.as_str().dimmed(),
            diagnostic.message
        );

        if let Some(ref suggestion) = diagnostic.suggestion {
            println!("       {} {}", "→".dimmed(), suggestion.italic());
        }
    }

    fn print_recommendations(&self, audited: &AuditedListing, profile: &MarketplaceProfile) {
        if audited.result.score >= 90 && !audited.result.has_errors() {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        for rec in ScoreCalculator::recommendations(&audited.result, profile)
            .iter()
            .take(3)
        {
            println!("   {} {}", "→".cyan(), rec);
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Listings audited: {}",
            stats.listings_audited.to_string().bold()
        );
        println!(
            "   Average score:    {} ({})",
            stats.average_score.to_string().bold(),
            self.colorize_grade(&Grade::from_score(stats.average_score))
        );
        println!("   Errors:           {}", stats.total_errors);
        println!("   Warnings:         {}", stats.total_warnings);
        if stats.unsellable > 0 {
            println!(
                "   {}",
                format!("{} listing(s) not sellable as-is", stats.unsellable).red()
            );
        }
        println!();
    }

    fn colorize_grade(&self, grade: &Grade) -> colored::ColoredString {
        let s = grade.to_string();
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        // colored drops the escapes itself for NO_COLOR and non-terminals
        if score >= 80 {
            bar.green().to_string()
        } else if score >= 60 {
            bar.yellow().to_string()
        } else {
            bar.red().to_string()
        }
    }

    fn create_mini_bar(&self, percent: u8) -> String {
        let filled = (percent.min(100) as usize) / 10;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}
