//! One-page-or-more PDF summary of the profile, drawn with the base-14 Helvetica faces.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::errors::AppError;
use crate::layout::{Page, PageConfig, Paginator, TextStyle, Typeface};
use crate::models::{Experience, Profile, Project, Skill};

pub const MAX_EXPERIENCES: usize = 6;
pub const MAX_SKILLS: usize = 24;
pub const MAX_PROJECTS: usize = 5;

const SECTION_GAP_PT: i32 = 6;
const ENTRY_GAP_PT: i32 = 4;

/// Everything the PDF draws, already in display order.
#[derive(Debug, Clone)]
pub struct ProfileDocument {
    pub profile: Profile,
    pub experiences: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
}

pub fn document_title(profile: &Profile) -> String {
    format!("{} – Profile", profile.full_name)
}

/// Lays the document out into pages of positioned lines.
pub fn layout_profile(doc: &ProfileDocument, config: &PageConfig) -> Vec<Page> {
    let profile = &doc.profile;
    let mut pages = Paginator::new(config);

    pages.set_style(TextStyle::bold(18));
    pages.draw(&profile.full_name, 22);
    if !profile.title.is_empty() {
        pages.set_style(TextStyle::regular(12));
        pages.draw(&profile.title, 18);
    }

    pages.set_style(TextStyle::regular(10));
    let contacts = [
        ("Email", &profile.email),
        ("Phone", &profile.phone),
        ("Website", &profile.website_url),
        ("GitHub", &profile.github_url),
        ("LinkedIn", &profile.linkedin_url),
        ("Location", &profile.location),
    ];
    for (label, value) in contacts {
        if !value.is_empty() {
            pages.put_wrapped("", &format!("{label}: {value}"));
        }
    }
    pages.skip(SECTION_GAP_PT);

    if !profile.bio.is_empty() {
        heading(&mut pages, "Summary");
        for line in profile.bio.lines() {
            pages.put_wrapped("", line);
        }
        pages.skip(SECTION_GAP_PT);
    }

    if !doc.experiences.is_empty() {
        heading(&mut pages, "Experience");
        for exp in doc.experiences.iter().take(MAX_EXPERIENCES) {
            pages.put_wrapped(
                "",
                &format!("{} · {} ({})", exp.role, exp.company, exp.date_range_label()),
            );
            if !exp.location.is_empty() {
                pages.put_wrapped("  ", &exp.location);
            }
            for line in exp.description.lines() {
                pages.put_wrapped("  ", line);
            }
            pages.skip(ENTRY_GAP_PT);
        }
    }

    if !doc.skills.is_empty() {
        heading(&mut pages, "Skills");
        let names: Vec<&str> = doc
            .skills
            .iter()
            .take(MAX_SKILLS)
            .map(|skill| skill.name.as_str())
            .collect();
        pages.put_wrapped("", &names.join(" • "));
        pages.skip(ENTRY_GAP_PT);
    }

    if !doc.projects.is_empty() {
        heading(&mut pages, "Projects");
        for project in doc.projects.iter().take(MAX_PROJECTS) {
            pages.put_wrapped("", &project.title);
            for line in project.description.lines() {
                pages.put_wrapped("  ", line);
            }
            if !project.project_url.is_empty() {
                pages.put_wrapped("  ", &format!("Live: {}", project.project_url));
            }
            if !project.repo_url.is_empty() {
                pages.put_wrapped("  ", &format!("Repo: {}", project.repo_url));
            }
            pages.skip(ENTRY_GAP_PT);
        }
    }

    pages.finish()
}

fn heading(pages: &mut Paginator<'_>, text: &str) {
    pages.set_style(TextStyle::bold(12));
    pages.put(text);
    pages.set_style(TextStyle::regular(10));
}

/// Lays out and serialises the profile PDF. CPU-bound; call from a blocking task.
pub fn render_profile_pdf(doc: &ProfileDocument, config: &PageConfig) -> Result<Vec<u8>, AppError> {
    let pages = layout_profile(doc, config);
    write_pdf(&pages, &document_title(&doc.profile), config)
}

pub fn write_pdf(pages: &[Page], title: &str, config: &PageConfig) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Typeface::Helvetica));
    let bold_id = doc.add_object(font_dictionary(Typeface::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Typeface::Helvetica.resource_name() => regular_id,
            Typeface::HelveticaBold.resource_name() => bold_id,
        },
    });
    let media_box: Vec<Object> = vec![
        0_i64.into(),
        0_i64.into(),
        i64::from(config.page_width_pt).into(),
        i64::from(config.page_height_pt).into(),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, page, pages_id, resources_id, &media_box)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal("portfolio-api"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::Export(format!("PDF serialisation failed: {e}")))?;
    Ok(buffer)
}

fn add_page(
    doc: &mut Document,
    page: &Page,
    pages_id: ObjectId,
    resources_id: ObjectId,
    media_box: &[Object],
) -> Result<ObjectId, AppError> {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                line.style.typeface.resource_name().into(),
                i64::from(line.style.size_pt).into(),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![i64::from(line.x_pt).into(), i64::from(line.y_pt).into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&line.text),
                StringFormat::Hexadecimal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| AppError::Export(format!("PDF content encoding failed: {e}")))?;
    let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box.to_vec(),
        "Resources" => resources_id,
        "Contents" => content_id,
    }))
}

fn font_dictionary(typeface: Typeface) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => typeface.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// PDF text string for document metadata: UTF-16BE with a byte-order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Transcodes text to WinAnsiEncoding bytes; unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' => b' ',
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}
