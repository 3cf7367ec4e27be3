use roxmltree::Node;

// Top-level sections of a vendor record
pub const WAVEFORM: &str = "Waveform";
pub const PATIENT_DEMOGRAPHICS: &str = "PatientDemographics";
pub const TEST_DEMOGRAPHICS: &str = "TestDemographics";
pub const ORDER: &str = "Order";
pub const RESTING_MEASUREMENTS: &str = "RestingECGMeasurements";
pub const DIAGNOSIS: &str = "Diagnosis";
pub const QRS_TIMES_TYPES: &str = "QRSTimesTypes";

// Waveform block elements
pub const WAVEFORM_TYPE: &str = "WaveformType";
pub const LEAD_DATA: &str = "LeadData";
pub const LEAD_ID: &str = "LeadID";
pub const LEAD_AMPLITUDE_UNITS_PER_BIT: &str = "LeadAmplitudeUnitsPerBit";
pub const WAVEFORM_DATA: &str = "WaveFormData";
pub const LEAD_SAMPLE_COUNT_TOTAL: &str = "LeadSampleCountTotal";
pub const HIGH_PASS_FILTER: &str = "HighPassFilter";
pub const LOW_PASS_FILTER: &str = "LowPassFilter";
pub const AC_FILTER: &str = "ACFilter";

/// Finds the first descendant element with the given name
pub fn find_first<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Iterates all descendant elements with the given name, in document order
pub fn find_all<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Finds the first direct child element with the given name
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Iterates direct child elements with the given name
pub fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Collects the text content of an element
///
/// Concatenates all text nodes below the element, so CDATA sections and
/// text split by comments are returned whole.
pub fn element_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Helper to get the trimmed text of a direct child element
///
/// Returns `None` if the child is missing or its text is empty
pub fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name)
        .map(element_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Helper to get the trimmed text of a direct child element with a default
pub fn child_text_or(node: Node, name: &str, default: &str) -> String {
    child_text(node, name).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const XML: &str = r#"<RestingECG>
  <PatientDemographics>
    <PatientID> 12345 </PatientID>
    <PatientFirstName></PatientFirstName>
  </PatientDemographics>
  <Waveform><WaveformType>Rhythm</WaveformType></Waveform>
  <Waveform><WaveformType>Median</WaveformType></Waveform>
  <Diagnosis><DiagnosisStatement><StmtText><![CDATA[Sinus rhythm]]></StmtText></DiagnosisStatement></Diagnosis>
</RestingECG>"#;

    #[test]
    fn test_find_first_and_child_text() {
        let doc = Document::parse(XML).unwrap();
        let patient = find_first(doc.root_element(), PATIENT_DEMOGRAPHICS).unwrap();
        assert_eq!(child_text(patient, "PatientID"), Some("12345".to_string()));
        assert_eq!(child_text(patient, "PatientFirstName"), None);
        assert_eq!(child_text(patient, "PatientLastName"), None);
        assert_eq!(child_text_or(patient, "PatientLastName", "0"), "0");
    }

    #[test]
    fn test_find_all_in_document_order() {
        let doc = Document::parse(XML).unwrap();
        let kinds: Vec<_> = find_all(doc.root_element(), WAVEFORM)
            .filter_map(|w| child_text(w, WAVEFORM_TYPE))
            .collect();
        assert_eq!(kinds, vec!["Rhythm", "Median"]);
    }

    #[test]
    fn test_cdata_text() {
        let doc = Document::parse(XML).unwrap();
        let stmt = find_first(doc.root_element(), "DiagnosisStatement").unwrap();
        assert_eq!(child_text(stmt, "StmtText"), Some("Sinus rhythm".to_string()));
    }

    #[test]
    fn test_children_only_direct() {
        let doc = Document::parse(XML).unwrap();
        assert_eq!(children(doc.root_element(), WAVEFORM).count(), 2);
        assert_eq!(children(doc.root_element(), "PatientID").count(), 0);
    }
}
