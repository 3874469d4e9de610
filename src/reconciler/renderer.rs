use crate::error::RenderError;
use crate::widget::WidgetDescriptor;

/// Widget runtime capability: turns a descriptor into markup for one slot.
pub trait WidgetRenderer {
    fn render(&mut self, descriptor: &WidgetDescriptor, slot: &str)
    -> Result<String, RenderError>;
}

/// Serves the precomputed `html` carried by the slot properties. Slots
/// without precomputed markup render empty and are filled by the widget
/// once it boots on the client.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotHtmlRenderer;

impl WidgetRenderer for SlotHtmlRenderer {
    fn render(
        &mut self,
        descriptor: &WidgetDescriptor,
        slot: &str,
    ) -> Result<String, RenderError> {
        let properties = descriptor.slot(slot).ok_or_else(|| {
            RenderError::new(format!("`{}` has no slot named `{slot}`", descriptor.name))
        })?;
        Ok(properties.html.clone().unwrap_or_default())
    }
}

/// Adapts a closure into a [`WidgetRenderer`].
pub struct FnRenderer<F> {
    render: F,
}

impl<F> FnRenderer<F>
where
    F: FnMut(&WidgetDescriptor, &str) -> Result<String, RenderError>,
{
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> WidgetRenderer for FnRenderer<F>
where
    F: FnMut(&WidgetDescriptor, &str) -> Result<String, RenderError>,
{
    fn render(
        &mut self,
        descriptor: &WidgetDescriptor,
        slot: &str,
    ) -> Result<String, RenderError> {
        (self.render)(descriptor, slot)
    }
}
