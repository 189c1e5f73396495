use crate::constants::{
    BANNER_ID, BOOT_MESSAGE_ID, BOOT_OVERLAY_ID, BOOT_PROGRESS_ID, HELP_OVERLAY_ID, HUD_ID,
};
use crate::dom;
use folio_core::boot::BootFrame;
use folio_core::effects::{Banner, BANNER_TITLE};
use folio_core::zones::ZONE_IDS;
use web_sys as web;

#[inline]
pub fn show_help(document: &web::Document, visible: bool) {
    dom::set_hidden(document, HELP_OVERLAY_ID, !visible);
}

/// Writes the boot overlay; returns true once it has been dismissed.
pub fn update_boot(document: &web::Document, frame: &BootFrame) -> bool {
    if frame.complete {
        dom::set_hidden(document, BOOT_OVERLAY_ID, true);
        return true;
    }
    dom::set_hidden(document, BOOT_OVERLAY_ID, false);
    if let Some(el) = document.get_element_by_id(BOOT_PROGRESS_ID) {
        _ = el.set_attribute("style", &format!("width:{}%", frame.progress));
    }
    dom::set_text(document, BOOT_MESSAGE_ID, frame.message);
    false
}

pub fn show_banner(document: &web::Document, banner: Option<&Banner>) {
    match banner {
        Some(b) => {
            if let Some(el) = document.get_element_by_id(BANNER_ID) {
                el.set_inner_html(&format!(
                    "<div class='egg-title'>{}</div><div class='egg-message'>{}</div>",
                    BANNER_TITLE, b.message
                ));
            }
            dom::set_hidden(document, BANNER_ID, false);
        }
        None => dom::set_hidden(document, BANNER_ID, true),
    }
}

/// Zone list with the keyboard selection and the active zone marked.
pub fn update_hud(document: &web::Document, selected: usize, active: &str, mode: &str) {
    if let Some(el) = document.get_element_by_id(HUD_ID) {
        let mut html = String::new();
        for (i, id) in ZONE_IDS.iter().enumerate() {
            let mut class = String::from("hud-zone");
            if i == selected {
                class.push_str(" selected");
            }
            if *id == active {
                class.push_str(" active");
            }
            html.push_str(&format!("<div class='{}'>{} {}</div>", class, i + 1, id));
        }
        html.push_str(&format!("<div class='hud-mode'>{}</div>", mode));
        el.set_inner_html(&html);
    }
}
