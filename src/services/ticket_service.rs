// src/services/ticket_service.rs
//
// Visitor ticket rendering. A ticket is a pure function of the pass
// snapshot: the pass is read first and the PDF/QR work happens outside
// any transaction.

use genpdf::{Alignment, Element, elements, style};
use image::{DynamicImage, Luma};
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PassRepository,
    models::pass::PassWithNames,
};

#[derive(Clone)]
pub struct TicketService {
    pass_repo: PassRepository,
}

impl TicketService {
    pub fn new(pass_repo: PassRepository) -> Self {
        Self { pass_repo }
    }

    pub async fn ticket_pdf(&self, pass_id: Uuid) -> Result<Vec<u8>, AppError> {
        let pass = self
            .pass_repo
            .find_detail(pass_id)
            .await?
            .ok_or(AppError::PassNotFound)?;

        // Rendering is CPU-bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || render_ticket(&pass))
            .await
            .map_err(|e| anyhow::anyhow!("ticket rendering task failed: {}", e))?
    }
}

fn render_ticket(pass: &PassWithNames) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
        .map_err(|e| AppError::PdfError(format!("font not found in ./fonts: {e}")))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Darshan Pass {}", pass.pass.qr_code_string));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // Header
    doc.push(
        elements::Paragraph::new("Siddhivinayak Temple")
            .aligned(Alignment::Center)
            .styled(style::Style::new().bold().with_font_size(20)),
    );
    doc.push(
        elements::Paragraph::new("Darshan Pass")
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(14)),
    );
    doc.push(elements::Break::new(1.5));

    // Visitor details
    let p = &pass.pass;
    doc.push(
        elements::Paragraph::new(format!("Visitor: {}", p.visitor_name))
            .styled(style::Style::new().bold().with_font_size(12)),
    );
    doc.push(elements::Paragraph::new(format!("Phone: {}", p.visitor_phone)));
    if let Some(email) = &p.visitor_email {
        doc.push(elements::Paragraph::new(format!("Email: {email}")));
    }
    doc.push(elements::Paragraph::new(format!("Date: {}", p.date)));
    doc.push(elements::Paragraph::new(format!("Time: {}", p.time)));
    doc.push(elements::Paragraph::new(format!("Total people: {}", p.total_people)));
    doc.push(elements::Paragraph::new(format!(
        "Valid for {} minutes after the slot",
        p.grace_minutes
    )));

    if let Some(count) = p.vastra_count {
        doc.push(elements::Paragraph::new(format!("Vastra count: {count}")));
        if let Some(names) = &p.vastra_names {
            doc.push(elements::Paragraph::new(format!("Names: {}", names.0.join(", "))));
        }
    }

    // Attendant contact
    if let Some(name) = &pass.attendant_name {
        doc.push(elements::Break::new(1.0));
        doc.push(
            elements::Paragraph::new("Your attendant:")
                .styled(style::Style::new().bold()),
        );
        let phone = pass.attendant_phone.as_deref().unwrap_or("-");
        doc.push(elements::Paragraph::new(format!("{name} - {phone}")));
    }

    // QR code
    doc.push(elements::Break::new(1.5));
    let code = QrCode::new(p.qr_code_string.as_bytes())
        .map_err(|e| AppError::PdfError(format!("QR encoding failed: {e}")))?;
    let qr_image = code.render::<Luma<u8>>().min_dimensions(240, 240).build();
    let qr_element = elements::Image::from_dynamic_image(DynamicImage::ImageLuma8(qr_image))
        .map_err(|e| AppError::PdfError(format!("QR embedding failed: {e}")))?
        .with_alignment(Alignment::Center);
    doc.push(qr_element);

    // Footer
    doc.push(elements::Break::new(1.5));
    doc.push(
        elements::Paragraph::new("Please show this QR code at the gate")
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(9)),
    );
    doc.push(
        elements::Paragraph::new("Temple timing: 6:00 AM - 9:00 PM")
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(9)),
    );

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::PdfError(format!("PDF rendering failed: {e}")))?;
    Ok(buffer)
}
