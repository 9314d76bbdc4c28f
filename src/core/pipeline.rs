//! Run orchestration: scan, transform and update.
//!
//! A run reads and extracts every unit in parallel, then works sequentially:
//!
//! 1. validated texts are deduplicated in sorted path order
//! 2. texts already in the source resource reuse their key; the rest are named
//!    by the [`KeySynthesizer`]
//! 3. the resource is merged and persisted
//! 4. rewrites are computed in memory, changed files are snapshotted, then
//!    written one by one
//!
//! Source files are only written once the resource is persisted and the
//! snapshot exists.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        Dialect, KeyMap, Progress, ProgressListener, ResourceEntry, SourceUnit, TextSet,
        error::PipelineError,
        extract::extract_unit,
        file_scanner::scan_files,
        is_natural_language,
        keygen::{AiKeyNamer, BatchNamer, KeySynthesizer},
        resource::ResourceStore,
        rewrite::{self, Site},
        snapshot::{Snapshot, SnapshotManager},
    },
    issues::{HardcodedTextIssue, ParseErrorIssue, WriteErrorIssue},
};

/// Output of [`Pipeline::scan`].
#[derive(Debug)]
pub struct ScanReport {
    pub files_scanned: usize,
    /// Every accepted occurrence, in unit order.
    pub hardcoded: Vec<HardcodedTextIssue>,
    /// Distinct accepted texts in first-seen order.
    pub texts: TextSet,
    pub parse_errors: Vec<ParseErrorIssue>,
}

/// Output of [`Pipeline::transform`].
#[derive(Debug)]
pub struct TransformReport {
    pub dry_run: bool,
    pub files_scanned: usize,
    pub text_count: usize,
    /// Texts that already had a key in the source resource.
    pub reused_count: usize,
    pub resource_path: PathBuf,
    pub added: Vec<ResourceEntry>,
    /// Files whose content changed (or would change in a dry run).
    pub changed_files: Vec<String>,
    pub snapshot: Option<Snapshot>,
    pub parse_errors: Vec<ParseErrorIssue>,
    pub write_errors: Vec<WriteErrorIssue>,
}

/// Output of [`Pipeline::update`].
#[derive(Debug)]
pub struct UpdateReport {
    pub dry_run: bool,
    pub files_scanned: usize,
    pub text_count: usize,
    pub resource_path: PathBuf,
    pub added: Vec<ResourceEntry>,
    /// Placeholder counts per other-language resource.
    pub placeholders: Vec<(PathBuf, usize)>,
    pub parse_errors: Vec<ParseErrorIssue>,
}

/// Units read from disk plus what extraction found in them.
struct Collected {
    units: Vec<SourceUnit>,
    hardcoded: Vec<HardcodedTextIssue>,
    texts: TextSet,
    parse_errors: Vec<ParseErrorIssue>,
}

/// Configuration plus the file list a run works on.
pub struct Pipeline {
    pub config: Config,
    /// Directory every configured path is relative to.
    pub root_dir: PathBuf,
    /// Source files in sorted path order.
    pub files: Vec<String>,
    pub verbose: bool,
}

impl Pipeline {
    /// Load configuration from the working directory, apply CLI overrides and
    /// scan the source directory.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let config = merged_config(common_args)?;
        Self::from_config(config, ".", common_args.verbose)
    }

    /// Build a pipeline over `root_dir` with an already merged configuration.
    pub fn from_config(config: Config, root_dir: impl Into<PathBuf>, verbose: bool) -> Result<Self> {
        config.validate()?;
        let root_dir = root_dir.into();

        let mut pipeline = Self {
            config,
            root_dir,
            files: Vec::new(),
            verbose,
        };

        let source_dir = pipeline.resolve(&pipeline.config.source_dir);
        if !source_dir.is_dir() {
            return Err(anyhow!(
                "Source directory '{}' does not exist",
                source_dir.display()
            ));
        }

        let excluded_dirs = [
            pipeline.resolve(&pipeline.config.backup.dir),
            pipeline.resolve(&pipeline.config.locale_dir),
        ];
        let scan_result = scan_files(
            &source_dir,
            &pipeline.config.ignores,
            &excluded_dirs,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        pipeline.files = scan_result.files;
        Ok(pipeline)
    }

    /// Resolve a configured path against the root directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            return p.to_path_buf();
        }
        let is_cur_dir = self
            .root_dir
            .components()
            .all(|c| matches!(c, Component::CurDir));
        if is_cur_dir {
            p.to_path_buf()
        } else {
            let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
            self.root_dir.join(rel)
        }
    }

    pub fn resource_path(&self, lang: &str) -> PathBuf {
        self.resolve(&self.config.locale_file(lang).to_string_lossy())
    }

    pub fn snapshots(&self) -> SnapshotManager {
        SnapshotManager::new(
            &self.root_dir,
            &self.config.backup.dir,
            self.config.backup.keep,
        )
    }

    /// Find hardcoded text without writing anything.
    pub fn scan(&self, listener: Option<&dyn ProgressListener>) -> ScanReport {
        let collected = self.collect(listener);
        ScanReport {
            files_scanned: collected.units.len() + collected.parse_errors.len(),
            hardcoded: collected.hardcoded,
            texts: collected.texts,
            parse_errors: collected.parse_errors,
        }
    }

    /// Assign keys, persist the source resource, snapshot and rewrite sources.
    ///
    /// In a dry run nothing is written; the report describes what would change.
    pub fn transform(
        &self,
        dry_run: bool,
        listener: Option<&dyn ProgressListener>,
    ) -> Result<TransformReport> {
        let collected = self.collect(listener);

        let mut store = ResourceStore::load(&self.resource_path(&self.config.source_lang))?;
        let (keys, reused_count) = self.assign_keys(&collected.texts, &store, listener);
        let added = store.merge(&keys);

        let mut sites: HashMap<&str, Vec<Site>> = HashMap::new();
        for issue in &collected.hardcoded {
            sites
                .entry(issue.context.file_path())
                .or_default()
                .push(Site::new(&issue.text, issue.kind, issue.context.line()));
        }

        let total = collected.units.len();
        let mut changes: Vec<(&str, String)> = Vec::new();
        for (index, unit) in collected.units.iter().enumerate() {
            let unit_sites = sites.get(unit.path.as_str()).map(Vec::as_slice).unwrap_or_default();
            if let Some(content) = rewrite::apply(unit, unit_sites, &keys) {
                changes.push((unit.path.as_str(), content));
            }
            if let Some(listener) = listener {
                listener.on_progress(&Progress {
                    text: unit.path.clone(),
                    current: index + 1,
                    total,
                });
            }
        }
        let changed_files: Vec<String> = changes.iter().map(|(p, _)| p.to_string()).collect();

        let mut report = TransformReport {
            dry_run,
            files_scanned: collected.units.len() + collected.parse_errors.len(),
            text_count: collected.texts.len(),
            reused_count,
            resource_path: store.path().to_path_buf(),
            added,
            changed_files,
            snapshot: None,
            parse_errors: collected.parse_errors,
            write_errors: Vec::new(),
        };

        if dry_run {
            return Ok(report);
        }

        if !report.added.is_empty() {
            store
                .save()
                .map_err(|e| PipelineError::resource_write(store.path(), e))?;
        }

        if changes.is_empty() {
            return Ok(report);
        }

        let paths: Vec<&str> = changes.iter().map(|(p, _)| *p).collect();
        let snapshot = self.snapshots().backup(&paths).map_err(PipelineError::Backup)?;
        if self.verbose {
            eprintln!(
                "Note: {} file(s) backed up to {}",
                snapshot.files.len(),
                snapshot.dir.display()
            );
        }
        report.snapshot = Some(snapshot);

        for (path, content) in &changes {
            if let Err(e) = fs::write(path, content) {
                if self.verbose {
                    eprintln!("{} {} - {}", "warning:".bold().yellow(), path, e);
                }
                report.write_errors.push(WriteErrorIssue {
                    file_path: path.to_string(),
                    error: format!("Failed to write file: {}", e),
                });
            }
        }

        Ok(report)
    }

    /// Add keys for new text to the source resource and empty placeholders for
    /// them to every other language resource. Sources are never rewritten.
    pub fn update(
        &self,
        dry_run: bool,
        listener: Option<&dyn ProgressListener>,
    ) -> Result<UpdateReport> {
        let collected = self.collect(listener);

        let mut store = ResourceStore::load(&self.resource_path(&self.config.source_lang))?;
        let (keys, _) = self.assign_keys(&collected.texts, &store, listener);
        let added = store.merge(&keys);
        let new_keys: Vec<&str> = added.iter().map(|entry| entry.key.as_str()).collect();

        let mut others = Vec::new();
        for path in self.other_resource_paths(store.path())? {
            let mut other = ResourceStore::load(&path)?;
            let count = other.add_placeholders(new_keys.iter().copied());
            others.push((other, count));
        }

        if !dry_run {
            if !added.is_empty() {
                store
                    .save()
                    .map_err(|e| PipelineError::resource_write(store.path(), e))?;
            }
            for (other, count) in &others {
                if *count > 0 {
                    other
                        .save()
                        .map_err(|e| PipelineError::resource_write(other.path(), e))?;
                }
            }
        }

        Ok(UpdateReport {
            dry_run,
            files_scanned: collected.units.len() + collected.parse_errors.len(),
            text_count: collected.texts.len(),
            resource_path: store.path().to_path_buf(),
            added,
            placeholders: others
                .into_iter()
                .map(|(other, count)| (other.path().to_path_buf(), count))
                .collect(),
            parse_errors: collected.parse_errors,
        })
    }

    /// Read and extract every unit in parallel; merge results in path order.
    fn collect(&self, listener: Option<&dyn ProgressListener>) -> Collected {
        let total = self.files.len();
        let done = AtomicUsize::new(0);

        let results: Vec<_> = self
            .files
            .par_iter()
            .map(|file_path| {
                let result = read_unit(file_path).and_then(|unit| {
                    let hardcoded = extract_unit(&unit)?
                        .into_iter()
                        .filter(|candidate| is_natural_language(&candidate.text))
                        .map(|candidate| HardcodedTextIssue {
                            context: candidate.context(),
                            text: candidate.text,
                            kind: candidate.kind,
                        })
                        .collect::<Vec<_>>();
                    Ok((unit, hardcoded))
                });

                if let Some(listener) = listener {
                    listener.on_progress(&Progress {
                        text: file_path.clone(),
                        current: done.fetch_add(1, Ordering::Relaxed) + 1,
                        total,
                    });
                }

                (file_path, result)
            })
            .collect();

        let mut collected = Collected {
            units: Vec::new(),
            hardcoded: Vec::new(),
            texts: TextSet::new(),
            parse_errors: Vec::new(),
        };

        for (file_path, result) in results {
            match result {
                Ok((unit, hardcoded)) => {
                    for issue in &hardcoded {
                        collected.texts.insert(&issue.text);
                    }
                    collected.hardcoded.extend(hardcoded);
                    collected.units.push(unit);
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                    }
                    collected.parse_errors.push(ParseErrorIssue {
                        file_path: file_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        collected
    }

    /// Reuse resource keys where the text is known, synthesize the rest.
    fn assign_keys(
        &self,
        texts: &TextSet,
        store: &ResourceStore,
        listener: Option<&dyn ProgressListener>,
    ) -> (KeyMap, usize) {
        let mut keys = KeyMap::new();
        let mut fresh = Vec::new();
        for text in texts.iter() {
            match store.key_for_text(text) {
                Some(key) => {
                    keys.insert(text, key);
                }
                None => fresh.push(text.to_string()),
            }
        }
        let reused = keys.len();

        let generation = &self.config.key_generation;
        let namer = AiKeyNamer::from_config(&generation.ai);
        if self.verbose && generation.ai.enabled && namer.is_none() {
            eprintln!(
                "{} AI key naming is enabled but not fully configured, using generated keys",
                "warning:".bold().yellow()
            );
        }

        let synthesizer = KeySynthesizer::new(generation.style, generation.batch_size)
            .with_namer(namer.as_ref().map(|n| n as &dyn BatchNamer))
            .verbose(self.verbose);

        let mut taken: HashSet<String> = store.keys().map(str::to_string).collect();
        for (text, key) in synthesizer.synthesize(&fresh, &mut taken, listener).iter() {
            keys.insert(text, key);
        }

        (keys, reused)
    }

    /// Every `<lang>.json` in the locale dir plus the configured target
    /// languages, except the source resource itself. Sorted, deduplicated.
    fn other_resource_paths(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self
            .config
            .target_langs
            .iter()
            .map(|lang| self.resource_path(lang))
            .collect();

        let locale_dir = self.resolve(&self.config.locale_dir);
        if locale_dir.is_dir() {
            for entry in fs::read_dir(&locale_dir)? {
                let path = entry?.path();
                if path.is_file() && path.extension().is_some_and(|e| e == "json") {
                    paths.push(path);
                }
            }
        }

        paths.retain(|p| p != source);
        paths.sort();
        paths.dedup();
        Ok(paths)
    }
}

/// Configuration from the working directory with CLI overrides applied.
///
/// Priority: CLI arguments, then `.trnowrc.json` / `.trnow.yml`, then defaults.
pub fn merged_config(common_args: &CommonArgs) -> Result<Config> {
    let root_dir = PathBuf::from(".");
    let search_dir = root_dir.canonicalize().unwrap_or(root_dir);

    let config_result = load_config(&search_dir)?;
    if common_args.verbose && !config_result.from_file {
        eprintln!("Note: No .trnowrc.json found, using default configuration");
    }

    let mut config = config_result.config;
    if let Some(ref src) = common_args.src {
        config.source_dir = src.to_string_lossy().to_string();
    }
    if let Some(ref locale_dir) = common_args.locale_dir {
        config.locale_dir = locale_dir.to_string_lossy().to_string();
    }
    if let Some(ref source_lang) = common_args.source_lang {
        config.source_lang = source_lang.clone();
    }
    if let Some(style) = common_args.key_style {
        config.key_generation.style = style;
    }
    if let Some(ref backup_dir) = common_args.backup_dir {
        config.backup.dir = backup_dir.to_string_lossy().to_string();
    }
    if let Some(ref api_key) = common_args.api_key {
        config.key_generation.ai.api_key = api_key.clone();
    }
    Ok(config)
}

fn read_unit(file_path: &str) -> Result<SourceUnit> {
    let dialect = Dialect::from_path(Path::new(file_path))
        .ok_or_else(|| anyhow!("Unsupported file type: {}", file_path))?;
    let content =
        fs::read_to_string(file_path).map_err(|e| anyhow!("Failed to read file: {}", e))?;
    Ok(SourceUnit::new(file_path, dialect, content))
}
