//! Minimal PDF writer: one full-page RGB raster image per page.
//!
//! Object layout: `1` is the catalog, `2` the page tree, and every page
//! adds an image XObject, a content stream and the page dictionary.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Points per rendered pixel (pages are rendered at 100 dpi)
const POINTS_PER_PIXEL: f64 = 0.72;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;

/// Streaming multi-page PDF writer
pub struct PdfWriter<W: Write> {
    out: W,
    position: u64,
    offsets: Vec<u64>,
    pages: Vec<usize>,
}

impl<W: Write> PdfWriter<W> {
    /// Write the file header
    pub fn new(out: W) -> io::Result<Self> {
        let mut writer = Self {
            out,
            position: 0,
            offsets: vec![0; PAGES_ID + 1],
            pages: Vec::new(),
        };
        writer.write_bytes(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;
        Ok(writer)
    }

    /// Number of pages written so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a page showing a `width` x `height` RGB8 image
    pub fn add_image_page(&mut self, width: u32, height: u32, rgb: &[u8]) -> io::Result<()> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("expected {} RGB bytes, got {}", expected, rgb.len()),
            ));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(rgb)?;
        let compressed = encoder.finish()?;

        let image_id = self.allocate();
        self.begin_object(image_id)?;
        let dict = format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB \
             /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>\nstream\n",
            width,
            height,
            compressed.len()
        );
        self.write_bytes(dict.as_bytes())?;
        self.write_bytes(&compressed)?;
        self.write_bytes(b"\nendstream\nendobj\n")?;

        let page_w = width as f64 * POINTS_PER_PIXEL;
        let page_h = height as f64 * POINTS_PER_PIXEL;
        let content = format!("q\n{:.2} 0 0 {:.2} 0 0 cm\n/Im0 Do\nQ\n", page_w, page_h);
        let content_id = self.allocate();
        self.begin_object(content_id)?;
        let stream = format!(
            "<< /Length {} >>\nstream\n{}endstream\nendobj\n",
            content.len(),
            content
        );
        self.write_bytes(stream.as_bytes())?;

        let page_id = self.allocate();
        self.begin_object(page_id)?;
        let page = format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Resources << /XObject << /Im0 {} 0 R >> >> /Contents {} 0 R >>\nendobj\n",
            PAGES_ID, page_w, page_h, image_id, content_id
        );
        self.write_bytes(page.as_bytes())?;
        self.pages.push(page_id);
        Ok(())
    }

    /// Write the page tree, catalog, cross-reference table and trailer
    pub fn finish(mut self) -> io::Result<W> {
        let kids: Vec<String> = self.pages.iter().map(|id| format!("{} 0 R", id)).collect();
        self.begin_object(PAGES_ID)?;
        let pages = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            self.pages.len()
        );
        self.write_bytes(pages.as_bytes())?;

        self.begin_object(CATALOG_ID)?;
        let catalog = format!("<< /Type /Catalog /Pages {} 0 R >>\nendobj\n", PAGES_ID);
        self.write_bytes(catalog.as_bytes())?;

        let xref_offset = self.position;
        let size = self.offsets.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets[1..] {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG_ID, xref_offset
        ));
        self.write_bytes(xref.as_bytes())?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn allocate(&mut self) -> usize {
        self.offsets.push(0);
        self.offsets.len() - 1
    }

    fn begin_object(&mut self, id: usize) -> io::Result<()> {
        self.offsets[id] = self.position;
        self.write_bytes(format!("{} 0 obj\n", id).as_bytes())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn two_page_document() -> Vec<u8> {
        let mut writer = PdfWriter::new(Vec::new()).unwrap();
        writer.add_image_page(2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
        writer.add_image_page(1, 1, &[10, 20, 30]).unwrap();
        assert_eq!(writer.page_count(), 2);
        writer.finish().unwrap()
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let pdf = two_page_document();
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));

        let text = String::from_utf8_lossy(&pdf);
        let startxref: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|s| s.lines().next())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(&pdf[startxref..startxref + 5], b"xref\n");

        let table = String::from_utf8_lossy(&pdf[startxref..]).into_owned();
        let mut lines = table.lines().skip(1);
        let header = lines.next().unwrap();
        assert_eq!(header, "0 9");
        lines.next(); // free entry
        for id in 1..9 {
            let entry = lines.next().unwrap();
            assert_eq!(entry.len(), 19);
            let offset: usize = entry[..10].parse().unwrap();
            let tag = format!("{} 0 obj\n", id);
            assert_eq!(&pdf[offset..offset + tag.len()], tag.as_bytes());
        }
        assert!(text.contains("/Size 9 /Root 1 0 R"));
        assert!(text.contains("/Kids [5 0 R 8 0 R] /Count 2"));
    }

    #[test]
    fn test_image_stream_inflates_to_pixels() {
        let pdf = two_page_document();
        let start = find(&pdf, b"stream\n").unwrap() + 7;
        let end = start + find(&pdf[start..], b"\nendstream").unwrap();

        let mut pixels = Vec::new();
        ZlibDecoder::new(&pdf[start..end])
            .read_to_end(&mut pixels)
            .unwrap();
        assert_eq!(pixels, vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let mut writer = PdfWriter::new(Vec::new()).unwrap();
        let err = writer.add_image_page(2, 2, &[0; 5]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(writer.page_count(), 0);
    }

    #[test]
    fn test_empty_document() {
        let pdf = PdfWriter::new(Vec::new()).unwrap().finish().unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/Kids [] /Count 0"));
        assert!(text.contains("0 3\n"));
    }
}
