//! # Scanner Module
//!
//! Discovers images and feeds them into the pipeline.
//!
//! Discovery is the pipeline's sole producer: it walks the configured
//! directories, puts one [`WorkItem`](crate::core::pipeline::WorkItem)
//! per image into the extract pile as it goes, and returns the final
//! image count. The controller publishes that count exactly once, after
//! enumeration ends, so stages can distinguish "count not yet known"
//! from "zero images".
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - WebP (.webp)
//! - GIF (.gif)
//! - BMP (.bmp)
//! - TIFF (.tiff, .tif)

mod filter;

pub use filter::ImageFilter;

use crate::core::pile::ConcurrentPile;
use crate::core::pipeline::WorkItem;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for image discovery
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// Walks directories and produces work items.
pub struct Discovery {
    config: ScanConfig,
    filter: ImageFilter,
}

impl Discovery {
    /// Create a new discovery producer with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    /// Enumerate every image under `roots`, putting one work item per
    /// image into `pile`. Returns the total number of items produced.
    ///
    /// Called exactly once per pipeline run. Unreadable entries are
    /// reported and skipped; they never become work items, so the
    /// returned count is exactly the number of items the pipeline will
    /// process.
    pub fn run(
        &self,
        roots: &[PathBuf],
        pile: &ConcurrentPile<WorkItem>,
        events: &EventSender,
    ) -> usize {
        events.send(Event::Scan(ScanEvent::Started {
            paths: roots.to_vec(),
        }));

        let mut total = 0;
        // Overlapping roots must not produce the same image twice: a
        // duplicate item would collapse in the ordered sink and leave
        // the completion count unreachable.
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for root in roots {
            if !root.is_dir() {
                let error = ScanError::DirectoryNotFound { path: root.clone() };
                warn!(path = %root.display(), "scan root is not a directory, skipping");
                events.send(Event::Scan(ScanEvent::Error {
                    path: root.clone(),
                    message: error.to_string(),
                }));
                continue;
            }

            let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
            if let Some(depth) = self.config.max_depth {
                walker = walker.max_depth(depth);
            }

            // Prune hidden entries at the walker so descent into hidden
            // directories stops entirely; the root itself is always kept
            // (the caller may legitimately point at a hidden directory).
            let include_hidden = self.config.include_hidden;
            let entries = walker.into_iter().filter_entry(move |entry| {
                include_hidden
                    || entry.depth() == 0
                    || entry
                        .file_name()
                        .to_str()
                        .map(|name| !name.starts_with('.'))
                        .unwrap_or(true)
            });

            for entry_result in entries {
                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                        let error = if e.io_error().map(|io| io.kind())
                            == Some(std::io::ErrorKind::PermissionDenied)
                        {
                            ScanError::PermissionDenied { path: path.clone() }
                        } else {
                            ScanError::ReadDirectory {
                                path: path.clone(),
                                source: std::io::Error::new(
                                    std::io::ErrorKind::Other,
                                    e.to_string(),
                                ),
                            }
                        };

                        warn!(path = %path.display(), error = %error, "failed to read entry");
                        events.send(Event::Scan(ScanEvent::Error {
                            path,
                            message: error.to_string(),
                        }));
                        continue;
                    }
                };

                let path = entry.path();

                if path.is_dir() {
                    continue;
                }

                if !self.filter.should_include(path) {
                    continue;
                }

                if !seen.insert(path.to_path_buf()) {
                    continue;
                }

                debug!(path = %path.display(), "discovered image");
                events.send(Event::Scan(ScanEvent::ImageFound {
                    path: path.to_path_buf(),
                }));

                pile.put(WorkItem::new(path.to_path_buf()));
                total += 1;
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: total,
        }));

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::null_sender;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_image(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        // Minimal JPEG header; discovery only looks at the name
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn empty_directory_yields_zero_items() {
        let temp_dir = TempDir::new().unwrap();
        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 0);
        assert!(pile.is_empty());
    }

    #[test]
    fn each_image_becomes_one_work_item() {
        let temp_dir = TempDir::new().unwrap();
        create_test_image(&temp_dir, "a.jpg");
        create_test_image(&temp_dir, "b.png");

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 2);
        assert_eq!(pile.len(), 2);
    }

    #[test]
    fn non_image_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        create_test_image(&temp_dir, "photo.jpg");
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 1);
    }

    #[test]
    fn nested_directories_are_traversed() {
        let temp_dir = TempDir::new().unwrap();
        create_test_image(&temp_dir, "root.jpg");

        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        let mut file = File::create(subdir.join("nested.jpg")).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 2);
    }

    #[test]
    fn images_under_hidden_directories_are_not_discovered() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".hidden");
        fs::create_dir(&hidden).unwrap();
        let mut file = File::create(hidden.join("secret.png")).unwrap();
        file.write_all(&[0x89, 0x50, 0x4E, 0x47]).unwrap();

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 0);
        assert!(pile.is_empty());
    }

    #[test]
    fn hidden_directories_are_traversed_when_opted_in() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".hidden");
        fs::create_dir(&hidden).unwrap();
        let mut file = File::create(hidden.join("secret.png")).unwrap();
        file.write_all(&[0x89, 0x50, 0x4E, 0x47]).unwrap();

        let pile = ConcurrentPile::new();
        let config = ScanConfig {
            include_hidden: true,
            ..Default::default()
        };
        let discovery = Discovery::new(config);

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 1);
    }

    #[test]
    fn hidden_files_are_excluded_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_test_image(&temp_dir, "visible.jpg");
        create_test_image(&temp_dir, ".hidden.jpg");

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 1);
        let item = pile.take().unwrap();
        assert!(item.path.ends_with("visible.jpg"));
    }

    #[test]
    fn nonexistent_root_produces_no_items() {
        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let total = discovery.run(
            &[PathBuf::from("/nonexistent/path/12345")],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, 0);
    }

    #[test]
    fn nonexistent_root_reports_directory_not_found() {
        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());
        let (sender, receiver) = crate::events::EventChannel::new();

        discovery.run(&[PathBuf::from("/nonexistent/path/12345")], &pile, &sender);
        drop(sender);

        let messages: Vec<String> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Scan(ScanEvent::Error { message, .. }) => Some(message),
                _ => None,
            })
            .collect();

        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Directory not found"));
    }

    #[test]
    fn overlapping_roots_count_each_image_once() {
        let temp_dir = TempDir::new().unwrap();
        create_test_image(&temp_dir, "once.jpg");

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());

        let root = temp_dir.path().to_path_buf();
        let total = discovery.run(&[root.clone(), root], &pile, &null_sender());

        assert_eq!(total, 1);
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn count_matches_items_put_into_pile() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            create_test_image(&temp_dir, &format!("img{i}.png"));
        }

        let pile = ConcurrentPile::new();
        let discovery = Discovery::new(ScanConfig::default());
        let total = discovery.run(
            &[temp_dir.path().to_path_buf()],
            &pile,
            &null_sender(),
        );

        assert_eq!(total, pile.len());
    }
}
