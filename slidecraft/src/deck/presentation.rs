//! Minimal PresentationML writer
//!
//! A `Presentation` is a list of slides, each a list of positioned text
//! blocks. `to_bytes` packs it into an OOXML package (zip + XML parts) that
//! PowerPoint, Keynote and LibreOffice open.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::writer::DeckWriter;
use crate::error::Result;

pub const EMU_PER_INCH: f64 = 914_400.0;
const EMU_PER_POINT: i64 = 12_700;

/// Slide dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// 13.333 x 7.5 inches (16:9).
    #[default]
    Wide,
    /// 10 x 7.5 inches (4:3).
    Standard,
}

impl Layout {
    /// Width and height in EMU.
    pub fn size(self) -> (i64, i64) {
        match self {
            Layout::Wide => (12_192_000, 6_858_000),
            Layout::Standard => (9_144_000, 6_858_000),
        }
    }
}

/// A coordinate or extent, absolute or relative to the slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Inches(f64),
    Percent(f64),
}

impl Length {
    fn to_emu(self, slide_extent: i64) -> i64 {
        match self {
            Length::Inches(inches) => (inches * EMU_PER_INCH).round() as i64,
            Length::Percent(percent) => (slide_extent as f64 * percent / 100.0).round() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    pub x: Length,
    pub y: Length,
    pub w: Length,
    pub h: Length,
    /// Points.
    pub font_size: u32,
    pub bold: bool,
    /// `RRGGBB`
    pub color: String,
    pub bullet: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub options: TextOptions,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    blocks: Vec<TextBlock>,
}

impl Slide {
    /// Add a text box. Each line of `text` becomes one paragraph.
    pub fn add_text(&mut self, text: impl Into<String>, options: TextOptions) -> &mut Self {
        self.blocks.push(TextBlock {
            text: text.into(),
            options,
        });
        self
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }
}

#[derive(Debug, Clone, Default)]
pub struct Presentation {
    layout: Layout,
    title: Option<String>,
    slides: Vec<Slide>,
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layout(&mut self, layout: Layout) -> &mut Self {
        self.layout = layout;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn add_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Pack the deck into `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let slide_count = self.slides.len();

        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".to_string(), content_types_xml(slide_count)),
            ("_rels/.rels".to_string(), PACKAGE_RELS.to_string()),
            ("docProps/core.xml".to_string(), core_xml(self.title.as_deref())),
            ("docProps/app.xml".to_string(), app_xml(slide_count)),
            ("ppt/presentation.xml".to_string(), presentation_xml(self.layout, slide_count)),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                presentation_rels(slide_count),
            ),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), SLIDE_MASTER.to_string()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                SLIDE_MASTER_RELS.to_string(),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), SLIDE_LAYOUT.to_string()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                SLIDE_LAYOUT_RELS.to_string(),
            ),
            ("ppt/theme/theme1.xml".to_string(), THEME.to_string()),
        ];

        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            parts.push((
                format!("ppt/slides/slide{number}.xml"),
                slide_xml(slide, self.layout),
            ));
            parts.push((
                format!("ppt/slides/_rels/slide{number}.xml.rels"),
                SLIDE_RELS.to_string(),
            ));
        }

        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Pack the deck and hand it to `writer` under `file_name`.
    pub async fn write_file(&self, writer: &dyn DeckWriter, file_name: &str) -> Result<PathBuf> {
        let bytes = self.to_bytes()?;
        writer.write(file_name, bytes).await
    }
}

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_ATTRS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn content_types_xml(slide_count: usize) -> String {
    let slides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();

    format!(
        r#"{XML_HEADER}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>{slides}<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#
    )
}

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

fn core_xml(title: Option<&str>) -> String {
    let title = escape(title.unwrap_or("Presentation"));
    format!(
        r#"{XML_HEADER}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>SlideCraft</dc:creator></cp:coreProperties>"#
    )
}

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"{XML_HEADER}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>SlideCraft</Application><Slides>{slide_count}</Slides></Properties>"#
    )
}

// rId1 is the master, slides follow, the theme comes last.
fn presentation_rels(slide_count: usize) -> String {
    let slides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Relationship Id="rId{}" Type="{REL_NS}/slide" Target="slides/slide{n}.xml"/>"#,
                n + 1
            )
        })
        .collect();
    let theme_id = slide_count + 2;

    format!(
        r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/slideMaster" Target="slideMasters/slideMaster1.xml"/>{slides}<Relationship Id="rId{theme_id}" Type="{REL_NS}/theme" Target="theme/theme1.xml"/></Relationships>"#
    )
}

fn presentation_xml(layout: Layout, slide_count: usize) -> String {
    let (cx, cy) = layout.size();
    let slide_ids: String = (1..=slide_count)
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1))
        .collect();
    let slide_list = if slide_ids.is_empty() {
        String::new()
    } else {
        format!("<p:sldIdLst>{slide_ids}</p:sldIdLst>")
    };

    format!(
        r#"{XML_HEADER}
<p:presentation {NS_ATTRS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slide_list}<p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

fn slide_xml(slide: &Slide, layout: Layout) -> String {
    let shapes: String = slide
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| shape_xml(block, index as u32 + 2, layout))
        .collect();

    format!(
        r#"{XML_HEADER}
<p:sld {NS_ATTRS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn shape_xml(block: &TextBlock, id: u32, layout: Layout) -> String {
    let (slide_w, slide_h) = layout.size();
    let options = &block.options;
    let x = options.x.to_emu(slide_w);
    let y = options.y.to_emu(slide_h);
    let cx = options.w.to_emu(slide_w);
    let cy = options.h.to_emu(slide_h);

    let paragraphs: String = paragraph_texts(&block.text)
        .into_iter()
        .map(|text| paragraph_xml(text, options))
        .collect();

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="t"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

// An empty text box still needs one paragraph.
fn paragraph_texts(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        vec![""]
    } else {
        lines
    }
}

fn paragraph_xml(text: &str, options: &TextOptions) -> String {
    let size = options.font_size * 100;
    let color = escape(options.color.as_str());
    let bold = if options.bold { r#" b="1""# } else { "" };

    if text.is_empty() {
        return format!(r#"<a:p><a:endParaRPr lang="en-US" sz="{size}"{bold} dirty="0"/></a:p>"#);
    }

    let bullet = if options.bullet {
        let indent = i64::from(options.font_size) * EMU_PER_POINT;
        format!(
            r#"<a:pPr marL="{indent}" indent="-{indent}"><a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>"#
        )
    } else {
        String::new()
    };

    format!(
        r#"<a:p>{bullet}<a:r><a:rPr lang="en-US" sz="{size}"{bold} dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        escape(text)
    )
}

const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#;

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;
