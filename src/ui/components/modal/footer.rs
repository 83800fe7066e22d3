//! Cancel / Delete / Save footer of the modal shell

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::config::{ModalConfig, ModalProps};
use crate::ui::components::theme::{ACCENT_ERROR, ACCENT_SUCCESS, TEXT_FAINT, TEXT_PRIMARY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FooterButton {
    Cancel,
    Delete,
    Save,
}

/// A button as it will be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterButtonView {
    pub kind: FooterButton,
    pub label: String,
    pub enabled: bool,
}

/// Result of pressing a footer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterPress {
    /// `on_open_change(false)` was called
    Closed,
    /// `on_delete` ran to completion
    Deleted,
    /// `on_save` ran to completion
    Saved,
    /// Button hidden or disabled; nothing was called
    Ignored,
}

pub struct ActionFooter;

impl ActionFooter {
    /// Buttons to draw, in order: Cancel, Delete, Save
    pub fn buttons(config: &ModalConfig<'_>) -> Vec<FooterButtonView> {
        let mut buttons = vec![FooterButtonView {
            kind: FooterButton::Cancel,
            label: config.cancel_label.clone(),
            enabled: true,
        }];

        if Self::is_rendered(config, FooterButton::Delete) {
            buttons.push(FooterButtonView {
                kind: FooterButton::Delete,
                label: config.delete_label.clone(),
                enabled: !config.is_delete_disabled,
            });
        }

        if Self::is_rendered(config, FooterButton::Save) {
            buttons.push(FooterButtonView {
                kind: FooterButton::Save,
                label: config.save_label.clone(),
                enabled: !config.is_save_disabled,
            });
        }

        buttons
    }

    /// Cancel always; Delete/Save only when shown and a handler exists
    pub fn is_rendered(config: &ModalConfig<'_>, kind: FooterButton) -> bool {
        match kind {
            FooterButton::Cancel => true,
            FooterButton::Delete => config.show_delete && config.on_delete.is_some(),
            FooterButton::Save => config.show_save && config.on_save.is_some(),
        }
    }

    /// Press a button. Handler errors are returned as-is.
    pub fn press(props: &mut ModalProps<'_>, kind: FooterButton) -> anyhow::Result<FooterPress> {
        match kind {
            FooterButton::Cancel => {
                props.request_close();
                Ok(FooterPress::Closed)
            }
            FooterButton::Delete => {
                if !Self::is_rendered(&props.config, kind) || props.config.is_delete_disabled {
                    return Ok(FooterPress::Ignored);
                }
                match props.config.on_delete.as_mut() {
                    Some(on_delete) => {
                        on_delete()?;
                        Ok(FooterPress::Deleted)
                    }
                    None => Ok(FooterPress::Ignored),
                }
            }
            FooterButton::Save => {
                if !Self::is_rendered(&props.config, kind) || props.config.is_save_disabled {
                    return Ok(FooterPress::Ignored);
                }
                match props.config.on_save.as_mut() {
                    Some(on_save) => {
                        on_save()?;
                        Ok(FooterPress::Saved)
                    }
                    None => Ok(FooterPress::Ignored),
                }
            }
        }
    }

    /// Draw the buttons right-aligned on the first row of `area` and return
    /// the rect of each one for mouse hit-testing
    pub fn render(
        buttons: &[FooterButtonView],
        area: Rect,
        buf: &mut Buffer,
    ) -> Vec<(FooterButton, Rect)> {
        if area.height == 0 || area.width == 0 {
            return Vec::new();
        }

        let texts: Vec<String> = buttons.iter().map(|b| format!("[ {} ]", b.label)).collect();
        let gap = 1u16;
        let total: u16 = texts
            .iter()
            .map(|t| t.width() as u16)
            .sum::<u16>()
            .saturating_add(gap * texts.len().saturating_sub(1) as u16);

        let mut x = area.x + area.width.saturating_sub(total);
        let right = area.x + area.width;
        let mut hits = Vec::with_capacity(buttons.len());

        for (button, text) in buttons.iter().zip(texts) {
            let width = (text.width() as u16).min(right.saturating_sub(x));
            if width == 0 {
                break;
            }
            let rect = Rect::new(x, area.y, width, 1);
            Span::styled(text, button_style(button)).render(rect, buf);
            hits.push((button.kind, rect));
            x = x.saturating_add(width + gap);
        }

        hits
    }
}

fn button_style(button: &FooterButtonView) -> Style {
    if !button.enabled {
        return Style::default().fg(TEXT_FAINT).add_modifier(Modifier::DIM);
    }
    match button.kind {
        FooterButton::Cancel => Style::default().fg(TEXT_PRIMARY),
        FooterButton::Delete => Style::default().fg(ACCENT_ERROR),
        FooterButton::Save => Style::default()
            .fg(ACCENT_SUCCESS)
            .add_modifier(Modifier::BOLD),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn kinds(config: &ModalConfig<'_>) -> Vec<FooterButton> {
        ActionFooter::buttons(config).iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_cancel_only_by_default() {
        let config = ModalConfig::new("Plain");
        assert_eq!(kinds(&config), vec![FooterButton::Cancel]);
    }

    #[test]
    fn test_buttons_need_flag_and_handler() {
        let config = ModalConfig::new("Flags only")
            .show_save(true)
            .show_delete(true);
        assert_eq!(kinds(&config), vec![FooterButton::Cancel]);

        let config = ModalConfig::new("Handlers only")
            .on_save(|| Ok(()))
            .on_delete(|| Ok(()));
        assert_eq!(kinds(&config), vec![FooterButton::Cancel]);

        let config = ModalConfig::new("Both")
            .show_save(true)
            .show_delete(true)
            .on_save(|| Ok(()))
            .on_delete(|| Ok(()));
        assert_eq!(
            kinds(&config),
            vec![FooterButton::Cancel, FooterButton::Delete, FooterButton::Save]
        );
    }

    #[test]
    fn test_cancel_closes_without_handlers() {
        let saved = Cell::new(0);
        let deleted = Cell::new(0);
        let opened = Cell::new(None);

        let config = ModalConfig::new("Edit")
            .show_save(true)
            .show_delete(true)
            .on_save(|| {
                saved.set(saved.get() + 1);
                Ok(())
            })
            .on_delete(|| {
                deleted.set(deleted.get() + 1);
                Ok(())
            });
        let mut props = ModalProps::new(true, |open| opened.set(Some(open)), config);

        let press = ActionFooter::press(&mut props, FooterButton::Cancel).unwrap();
        assert_eq!(press, FooterPress::Closed);
        drop(props);

        assert_eq!(opened.get(), Some(false));
        assert_eq!(saved.get(), 0);
        assert_eq!(deleted.get(), 0);
    }

    #[test]
    fn test_disabled_save_is_drawn_but_inert() {
        let saved = Cell::new(0);
        let config = ModalConfig::new("Busy")
            .show_save(true)
            .save_disabled(true)
            .on_save(|| {
                saved.set(saved.get() + 1);
                Ok(())
            });

        let buttons = ActionFooter::buttons(&config);
        assert_eq!(buttons.len(), 2);
        assert!(!buttons[1].enabled);

        let mut props = ModalProps::new(true, |_| {}, config);
        let press = ActionFooter::press(&mut props, FooterButton::Save).unwrap();
        assert_eq!(press, FooterPress::Ignored);
        drop(props);
        assert_eq!(saved.get(), 0);
    }

    #[test]
    fn test_handler_error_propagates() {
        let config = ModalConfig::new("Failing")
            .show_delete(true)
            .on_delete(|| Err(anyhow::anyhow!("backend said no")));
        let mut props = ModalProps::new(true, |_| {}, config);

        let err = ActionFooter::press(&mut props, FooterButton::Delete).unwrap_err();
        assert_eq!(err.to_string(), "backend said no");
    }

    #[test]
    fn test_render_returns_hit_rects_in_order() {
        let config = ModalConfig::new("Both")
            .show_save(true)
            .on_save(|| Ok(()));
        let buttons = ActionFooter::buttons(&config);

        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        let hits = ActionFooter::render(&buttons, area, &mut buf);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, FooterButton::Cancel);
        assert_eq!(hits[1].0, FooterButton::Save);
        assert!(hits[0].1.x < hits[1].1.x);
        assert_eq!(hits[1].1.x + hits[1].1.width, 40);
    }
}
