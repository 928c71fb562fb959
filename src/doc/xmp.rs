//! XMP metadata packet for PDF/A-1

use crate::pdf::Dictionary;

/// PDF/A-1 conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfAConformance {
    /// Level A, accessible
    PdfA1A,
    /// Level B, visual appearance only
    PdfA1B,
}

impl PdfAConformance {
    pub fn part(&self) -> u8 {
        1
    }

    pub fn level(&self) -> &'static str {
        match self {
            PdfAConformance::PdfA1A => "A",
            PdfAConformance::PdfA1B => "B",
        }
    }
}

const PACKET_HEADER: &str = "<?xpacket begin=\"\u{FEFF}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n";
const PACKET_TRAILER: &str = "<?xpacket end=\"w\"?>";

/// Serialize the packet from the Info dictionary
pub fn build_xmp(info: &Dictionary, conformance: PdfAConformance) -> String {
    let text = |key: &str| {
        info.get_string(key)
            .map(|v| escape_xml(&String::from_utf8_lossy(v)))
            .filter(|v| !v.is_empty())
    };
    let date = |key: &str| {
        info.get_string(key)
            .and_then(|v| pdf_date_to_xmp(&String::from_utf8_lossy(v)))
    };

    let mut xmp = String::from(PACKET_HEADER);
    xmp.push_str("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\n");
    xmp.push_str("<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n");
    xmp.push_str(concat!(
        "<rdf:Description rdf:about=\"\"",
        " xmlns:dc=\"http://purl.org/dc/elements/1.1/\"",
        " xmlns:xmp=\"http://ns.adobe.com/xap/1.0/\"",
        " xmlns:pdf=\"http://ns.adobe.com/pdf/1.3/\"",
        " xmlns:pdfaid=\"http://www.aiim.org/pdfa/ns/id/\">\n"
    ));

    element(&mut xmp, "pdfaid:part", &conformance.part().to_string());
    element(&mut xmp, "pdfaid:conformance", conformance.level());

    if let Some(title) = text("Title") {
        xmp.push_str(&format!(
            "<dc:title><rdf:Alt><rdf:li xml:lang=\"x-default\">{}</rdf:li></rdf:Alt></dc:title>\n",
            title
        ));
    }
    if let Some(author) = text("Author") {
        xmp.push_str(&format!(
            "<dc:creator><rdf:Seq><rdf:li>{}</rdf:li></rdf:Seq></dc:creator>\n",
            author
        ));
    }
    if let Some(subject) = text("Subject") {
        xmp.push_str(&format!(
            "<dc:description><rdf:Alt><rdf:li xml:lang=\"x-default\">{}</rdf:li></rdf:Alt></dc:description>\n",
            subject
        ));
    }

    let simple = [
        ("pdf:Keywords", text("Keywords")),
        ("xmp:CreatorTool", text("Creator")),
        ("pdf:Producer", text("Producer")),
        ("xmp:CreateDate", date("CreationDate")),
        ("xmp:ModifyDate", date("ModDate")),
    ];
    for (tag, value) in simple {
        if let Some(value) = value {
            element(&mut xmp, tag, &value);
        }
    }

    xmp.push_str("</rdf:Description>\n</rdf:RDF>\n</x:xmpmeta>\n");
    xmp.push_str(PACKET_TRAILER);
    xmp
}

fn element(xmp: &mut String, tag: &str, value: &str) {
    xmp.push_str(&format!("<{tag}>{value}</{tag}>\n"));
}

/// `D:YYYYMMDDHHmmSS+HH'mm'` to `YYYY-MM-DDTHH:mm:SS+HH:mm`
pub fn pdf_date_to_xmp(date: &str) -> Option<String> {
    let digits = date.strip_prefix("D:").unwrap_or(date);
    if digits.len() < 14 || !digits.is_char_boundary(14) {
        return None;
    }
    let (stamp, zone) = digits.split_at(14);
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut out = format!(
        "{}-{}-{}T{}:{}:{}",
        &stamp[0..4],
        &stamp[4..6],
        &stamp[6..8],
        &stamp[8..10],
        &stamp[10..12],
        &stamp[12..14]
    );

    match zone.chars().next() {
        None | Some('Z') => out.push('Z'),
        Some(sign @ ('+' | '-')) => {
            let parts: Vec<&str> = zone[1..].split('\'').filter(|p| !p.is_empty()).collect();
            let hours = parts.first().copied().unwrap_or("00");
            let minutes = parts.get(1).copied().unwrap_or("00");
            out.push_str(&format!("{}{}:{}", sign, hours, minutes));
        }
        Some(_) => return None,
    }
    Some(out)
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
