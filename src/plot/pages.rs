use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::RgbImage;

use super::pdf::PdfWriter;
use super::PlotError;

/// Destination for rendered pages, chosen by the output file extension
pub enum PageSink {
    /// All pages in one PDF document
    Pdf {
        /// Document path
        path: PathBuf,
        /// Open writer
        writer: PdfWriter<BufWriter<File>>,
    },
    /// One `<stem>-<n>.png` per page next to the output path
    Png {
        /// Output path the page names derive from
        path: PathBuf,
        /// Pages written so far
        count: usize,
    },
}

impl PageSink {
    /// Open a sink for `path`; `.pdf` and `.png` are supported
    pub fn create(path: &Path) -> Result<Self, PlotError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => {
                let file = File::create(path)?;
                Ok(PageSink::Pdf {
                    path: path.to_path_buf(),
                    writer: PdfWriter::new(BufWriter::new(file))?,
                })
            }
            Some("png") => Ok(PageSink::Png {
                path: path.to_path_buf(),
                count: 0,
            }),
            _ => Err(PlotError::UnsupportedOutput(path.to_path_buf())),
        }
    }

    /// Path of PNG page `n` (one-based) for output `path`
    pub fn png_page_path(path: &Path, n: usize) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{}-{}.png", stem, n))
    }

    /// Add one RGB8 page
    pub fn add_page(&mut self, width: u32, height: u32, rgb: Vec<u8>) -> Result<(), PlotError> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(PlotError::PageSize {
                width,
                height,
                len: rgb.len(),
                expected,
            });
        }
        match self {
            PageSink::Pdf { writer, .. } => {
                writer.add_image_page(width, height, &rgb)?;
            }
            PageSink::Png { path, count } => {
                let image = RgbImage::from_raw(width, height, rgb).ok_or(PlotError::PageSize {
                    width,
                    height,
                    len: expected,
                    expected,
                })?;
                *count += 1;
                let page_path = Self::png_page_path(path, *count);
                image.save(&page_path)?;
                log::debug!("Wrote {}", page_path.display());
            }
        }
        Ok(())
    }

    /// Drop the sink and remove whatever it wrote so far
    pub fn discard(self) {
        let paths = match self {
            PageSink::Pdf { path, writer } => {
                drop(writer);
                vec![path]
            }
            PageSink::Png { path, count } => (1..=count)
                .map(|n| Self::png_page_path(&path, n))
                .collect(),
        };
        for path in paths {
            if let Err(err) = std::fs::remove_file(&path) {
                log::warn!("Could not remove {}: {}", path.display(), err);
            }
        }
    }

    /// Close the sink, returning the number of pages written
    pub fn finish(self) -> Result<usize, PlotError> {
        match self {
            PageSink::Pdf { path, writer } => {
                let pages = writer.page_count();
                writer.finish()?;
                log::info!("Wrote {} pages to {}", pages, path.display());
                Ok(pages)
            }
            PageSink::Png { path, count } => {
                log::info!(
                    "Wrote {} pages as {}",
                    count,
                    Self::png_page_path(&path, 1).display()
                );
                Ok(count)
            }
        }
    }
}
