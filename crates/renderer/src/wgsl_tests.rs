#[test]
fn renderer_wgsl_sources_parse_successfully() {
    parse_wgsl("frame_blit.wgsl", include_str!("frame_blit.wgsl"));
}

fn parse_wgsl(label: &str, source: &str) {
    naga::front::wgsl::parse_str(source).unwrap_or_else(|error| {
        panic!(
            "WGSL parse failed for {label}: {}",
            error.emit_to_string(source)
        )
    });
}
