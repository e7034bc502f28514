use cell_core::{
    CellViewModel, Color, ContentMode, DetectorKind, Font, ImageHandle, Insets, LineBreak,
    StyleAttributes,
};

/// Instructions for the text, image and indicator views that draw a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    SetLabelLayout {
        insets: Insets,
        font: Font,
        number_of_lines: u32,
        line_break: LineBreak,
    },
    SetEnabledDetectors(Vec<DetectorKind>),
    SetDetectorAttributes {
        detector: DetectorKind,
        attributes: StyleAttributes,
    },
    SetLabelText(Option<String>),
    SetTextColor(Color),
    SetImage {
        image: Option<ImageHandle>,
        content_mode: ContentMode,
    },
    StartIndicator,
    StopIndicator,
}

/// Full snapshot of the label and image views. Text color always comes after
/// detector attributes so it wins for any run both of them style.
pub fn render(view: &CellViewModel) -> Vec<RenderCommand> {
    let label = &view.label;
    let mut cmds = Vec::with_capacity(5 + label.detector_attributes.len());

    cmds.push(RenderCommand::SetLabelLayout {
        insets: label.insets,
        font: label.font.clone(),
        number_of_lines: label.number_of_lines,
        line_break: label.line_break,
    });
    cmds.push(RenderCommand::SetEnabledDetectors(
        label.enabled_detectors.iter().copied().collect(),
    ));
    for (detector, attributes) in &label.detector_attributes {
        cmds.push(RenderCommand::SetDetectorAttributes {
            detector: *detector,
            attributes: *attributes,
        });
    }
    cmds.push(RenderCommand::SetLabelText(label.text.clone()));
    if let Some(color) = label.text_color {
        cmds.push(RenderCommand::SetTextColor(color));
    }
    cmds.push(RenderCommand::SetImage {
        image: view.image_view.image.clone(),
        content_mode: view.image_view.content_mode,
    });

    cmds
}
