//! Media attachment processing for Discord messages.

use log::debug;
use mime::Mime;
use poise::serenity_prelude::Attachment;

/// True if the MIME content type names an image.
#[must_use]
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .parse::<Mime>()
        .is_ok_and(|mime| mime.type_() == mime::IMAGE)
}

/// Check if an attachment is an image the vision model can look at
#[must_use]
pub fn is_image_attachment(attachment: &Attachment) -> bool {
    attachment
        .content_type
        .as_deref()
        .is_some_and(is_image_content_type)
}

/// URL of the first image attachment, if any
#[must_use]
pub fn first_image_url(attachments: &[Attachment]) -> Option<String> {
    let attachment = attachments.iter().find(|a| is_image_attachment(a))?;
    debug!("Using image attachment: {}", attachment.filename);
    Some(attachment.url.clone())
}
