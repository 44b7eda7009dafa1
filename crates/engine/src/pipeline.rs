//! Per-unit counting pipeline.
//!
//! Drives each unit through `Uncounted -> EmbeddedCheckPending -> SplitOrKeep
//! -> Counting -> Finalized`. Units are processed strictly in arena order, so
//! extracts appended while splitting a host are counted after it.

use std::sync::Arc;

use polyloc_core::{
    CommentStripper, ComplexityTally, KeywordTally, LanguageProfile, LineClassifier,
    QuotePreprocessor,
};

use crate::config::RuntimeParameters;
use crate::diff_export::DiffExporter;
use crate::duplicate::{checksum_owner, line_checksum};
use crate::error::{EngineError, Result};
use crate::registry::ProfileRegistry;
use crate::source::load_text;
use crate::splitter::EmbeddedLanguageSplitter;
use crate::unit::{UnitArena, UnitId, UnitMetrics, UnitSource, UnitState};

/// A failure scoped to one unit. The run continues.
#[derive(Debug)]
pub struct UnitError {
    pub unit: UnitId,
    pub name: String,
    pub error: EngineError,
}

pub struct CounterPipeline<'a> {
    splitter: EmbeddedLanguageSplitter<'a>,
    params: &'a RuntimeParameters,
    exporter: Option<DiffExporter>,
}

/// Where a unit's counted lines are routed.
struct Routing {
    root_name: String,
    checksum_owner: Option<UnitId>,
}

impl<'a> CounterPipeline<'a> {
    #[must_use]
    pub fn new(registry: &'a ProfileRegistry, params: &'a RuntimeParameters) -> Self {
        Self {
            splitter: EmbeddedLanguageSplitter::new(registry, params.extraction_limits),
            params,
            exporter: params
                .diff_code
                .then(|| DiffExporter::new(&params.diff_dir, params.diff_delimiter)),
        }
    }

    /// Count every unit in the arena, including extracts appended on the way.
    pub fn process_all(&mut self, units: &mut UnitArena) -> Vec<UnitError> {
        let mut errors = Vec::new();
        let mut index = 0;
        while let Some(id) = units.id_at(index) {
            self.process_unit(units, id, &mut errors);
            index += 1;
        }
        errors
    }

    /// Count a single unit. Failures are pushed onto `errors`.
    ///
    /// A unit whose source cannot be read stays `Uncounted`. Write and close
    /// failures are reported but the unit is still finalized.
    pub fn process_unit(&mut self, units: &mut UnitArena, id: UnitId, errors: &mut Vec<UnitError>) {
        let Some(unit) = units.get(id) else {
            return;
        };
        if unit.is_counted() {
            return;
        }
        let name = unit.name.clone();
        let mut report = |error: EngineError| {
            log::warn!("{name}: {error}");
            errors.push(UnitError {
                unit: id,
                name: name.clone(),
                error,
            });
        };

        let text = match &unit.source {
            UnitSource::File(path) => match load_text(path) {
                Ok(text) => text,
                Err(e) => {
                    report(e);
                    return;
                }
            },
            UnitSource::Embedded(body) => body.clone(),
        };

        let limit_reached = match self.split_or_keep(units, id, &text) {
            Ok(limit_reached) => limit_reached,
            Err(e) => {
                report(e);
                return;
            }
        };

        let Some(unit) = units.get_mut(id) else {
            return;
        };
        unit.advance(UnitState::Counting);
        let profile = Arc::clone(&unit.profile);
        let counted_text = match unit.host_text.take() {
            Some(host) if !limit_reached => host,
            _ => text,
        };

        let routing = Routing {
            root_name: units
                .get(units.root_of(id))
                .map_or_else(|| name.clone(), |root| root.name.clone()),
            checksum_owner: if self.params.search_for_dups {
                checksum_owner(units, id)
            } else {
                None
            },
        };

        let (metrics, checksums) = self.count_lines(&profile, &counted_text, &routing, &mut report);

        if let Some(unit) = units.get_mut(id) {
            unit.finalize(metrics);
        }
        if let Some(owner) = routing.checksum_owner.and_then(|o| units.get_mut(o)) {
            owner.line_checksums.extend(checksums);
        }
        if let Some(exporter) = self.exporter.as_mut()
            && let Err(e) = exporter.close()
        {
            report(e);
        }
    }

    /// `Ok(true)` when the host had to be counted whole because of the limits.
    fn split_or_keep(&self, units: &mut UnitArena, id: UnitId, text: &str) -> Result<bool> {
        let top_level = units.get(id).is_some_and(|u| u.is_top_level());
        if top_level {
            if let Some(unit) = units.get_mut(id) {
                unit.advance(UnitState::EmbeddedCheckPending);
            }
        }

        let limit_reached = if top_level {
            self.splitter.handle_embedded_code(units, id, text)?
        } else {
            false
        };

        if let Some(unit) = units.get_mut(id) {
            unit.advance(UnitState::SplitOrKeep);
        }
        Ok(limit_reached)
    }

    fn count_lines(
        &mut self,
        profile: &LanguageProfile,
        text: &str,
        routing: &Routing,
        report: &mut impl FnMut(EngineError),
    ) -> (UnitMetrics, Vec<u64>) {
        let case_sensitive = profile.case_sensitive;
        let quotes = QuotePreprocessor::new(profile);
        let mut stripper = CommentStripper::new(profile);
        let mut classifier = LineClassifier::new(profile.lsloc.clone());
        let mut exec = KeywordTally::new(profile.exec_keywords.as_slice(), case_sensitive)
            .with_word_chars(&profile.word_chars);
        let mut data = KeywordTally::new(profile.data_keywords.as_slice(), case_sensitive)
            .with_word_chars(&profile.word_chars);
        let mut complexity = self.params.count_complexity_metrics.then(|| {
            ComplexityTally::new(&profile.complexity, case_sensitive)
                .with_word_chars(&profile.word_chars)
        });

        let mut metrics = UnitMetrics {
            language_version: profile.version.clone(),
            ..UnitMetrics::default()
        };
        let mut sink = LineSink::default();
        // last line of a statement still open at the end of the unit
        let mut open_statement: Option<String> = None;

        for raw in text.lines() {
            metrics.total_lines += 1;

            let line = profile.fold_case(raw.trim());
            let line = quotes.remove_escapes(&line);
            let line = quotes.collapse_empty(&line);
            let code = stripper.strip(line.trim());
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            let code = if profile.strip_paths {
                quotes.strip_paths(code)
            } else {
                code.to_string()
            };

            let weight = classifier.classify(&code);
            let scrubbed = quotes.strip_contents(&code);
            let mut remaining = scrubbed.clone();
            let exec_hits = exec.consume(&mut remaining);
            let data_hits = data.consume(&mut remaining);
            if let Some(tally) = complexity.as_mut()
                && !scrubbed.trim().is_empty()
            {
                tally.tally(&scrubbed);
            }

            metrics.psloc += weight.physical;
            metrics.lsloc += weight.logical;
            if data_hits > 0 && exec_hits == 0 {
                metrics.data_physical += weight.physical;
                metrics.data_logical += weight.logical;
            } else {
                metrics.exec_physical += weight.physical;
                metrics.exec_logical += weight.logical;
            }

            if weight.logical > 0 {
                self.emit(&mut sink, routing, weight.logical, &code, report);
            }
            open_statement = classifier.is_pending().then_some(code);
        }

        let flushed = classifier.finish();
        metrics.lsloc += flushed;
        metrics.exec_logical += flushed;
        if flushed > 0
            && let Some(code) = open_statement
        {
            self.emit(&mut sink, routing, flushed, &code, report);
        }

        let comments = stripper.tally();
        metrics.blank_lines = comments.blank;
        metrics.whole_comments = comments.whole;
        metrics.embedded_comments = comments.embedded;
        metrics.exec_keywords = exec.to_map();
        metrics.data_keywords = data.to_map();
        metrics.complexity = complexity.map(|c| c.counts());

        (metrics, sink.checksums)
    }

    /// Route one logical line to the checksum sequence and the diff artifact.
    fn emit(
        &mut self,
        sink: &mut LineSink,
        routing: &Routing,
        weight: usize,
        code: &str,
        report: &mut impl FnMut(EngineError),
    ) {
        if routing.checksum_owner.is_some() {
            sink.checksums.push(line_checksum(code));
        }
        if let Some(exporter) = self.exporter.as_mut()
            && !sink.export_failed
            && let Err(e) = exporter.append(&routing.root_name, weight, code)
        {
            sink.export_failed = true;
            report(e);
        }
    }
}

/// Per-unit output of the counted lines.
#[derive(Default)]
struct LineSink {
    checksums: Vec<u64>,
    export_failed: bool,
}
