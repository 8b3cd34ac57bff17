// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::appointment::{InvoiceDocument, InvoiceStatus},
};

const COMPANY_NAME: &str = "7PET BANHO E TOSA";
const FONT_FAMILY: &str = "Roboto";

fn render_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

pub fn status_label(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Pendente => "PENDENTE",
        InvoiceStatus::Pago => "PAGA",
        InvoiceStatus::Cancelado => "CANCELADA",
    }
}

/// Saldo em aberto, nunca negativo
pub fn balance_due(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: String,
    pix_key: Option<String>,
}

impl DocumentService {
    pub fn new(fonts_dir: String, pix_key: Option<String>) -> Self {
        Self { fonts_dir, pix_key: pix_key.filter(|k| !k.is_empty()) }
    }

    pub fn render_invoice(&self, document: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
        let invoice = &document.invoice;
        let short_id = invoice.id.simple().to_string()[..8].to_uppercase();

        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, FONT_FAMILY, None)
            .map_err(|_| AppError::FontNotFound(format!("Fonte não encontrada na pasta {}", self.fonts_dir)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Fatura #{}", short_id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(COMPANY_NAME)
            .styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(format!("FATURA #{}", short_id))
            .styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Paragraph::new(format!("Emissão: {}", invoice.issued_at.format("%d/%m/%Y"))));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", document.customer_name)));
        doc.push(elements::Paragraph::new(format!("Situação: {}", status_label(invoice.status))));
        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Descrição (4), Qtd (1), Unitário (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table.row()
            .element(elements::Paragraph::new("Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Unitário").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .map_err(render_error)?;

        for line in &document.lines {
            table.row()
                .element(elements::Paragraph::new(line.description.clone()))
                .element(elements::Paragraph::new(line.quantity.to_string()))
                .element(elements::Paragraph::new(format!("R$ {:.2}", line.unit_price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", line.total)))
                .push()
                .map_err(render_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut total_paragraph = elements::Paragraph::new(format!("TOTAL: R$ {:.2}", invoice.total));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        let mut paid_paragraph = elements::Paragraph::new(format!("Pago: R$ {:.2}", document.paid_total));
        paid_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(paid_paragraph);

        let due = balance_due(invoice.total, document.paid_total);
        let mut due_paragraph = elements::Paragraph::new(format!("Em aberto: R$ {:.2}", due));
        due_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(due_paragraph.styled(style::Style::new().bold()));

        doc.push(elements::Break::new(2));

        // --- PIX (QR CODE) ---
        // Só para faturas com saldo em aberto
        let open = due > Decimal::ZERO && invoice.status == InvoiceStatus::Pendente;
        if let Some(key) = self.pix_key.as_ref().filter(|_| open) {
            doc.push(elements::Paragraph::new("PAGAMENTO VIA PIX")
                .styled(style::Style::new().bold().with_font_size(12)));
            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            let code = QrCode::new(key.as_bytes()).map_err(render_error)?;
            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
                .map_err(render_error)?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(render_error)?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_never_goes_negative() {
        assert_eq!(balance_due(Decimal::new(10000, 2), Decimal::new(4000, 2)), Decimal::new(6000, 2));
        assert_eq!(balance_due(Decimal::new(10000, 2), Decimal::new(12000, 2)), Decimal::ZERO);
    }

    #[test]
    fn missing_fonts_are_reported() {
        use crate::models::appointment::Invoice;
        use chrono::Utc;
        use uuid::Uuid;

        let service = DocumentService::new("/caminho/que/nao/existe".into(), None);
        let document = InvoiceDocument {
            invoice: Invoice {
                id: Uuid::new_v4(),
                customer_id: Uuid::new_v4(),
                appointment_id: None,
                quote_id: None,
                total: Decimal::new(8000, 2),
                status: InvoiceStatus::Pendente,
                issued_at: Utc::now(),
                paid_at: None,
            },
            customer_name: "Ana".into(),
            lines: vec![],
            paid_total: Decimal::ZERO,
        };

        assert!(matches!(service.render_invoice(&document), Err(AppError::FontNotFound(_))));
    }
}
