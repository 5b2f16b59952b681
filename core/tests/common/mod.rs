#![allow(dead_code)]

use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::{tags, uids};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use std::path::{Path, PathBuf};

pub const AXIAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
pub const CORONAL: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 0.0, -1.0];

/// One synthetic 2x2 MR slice
#[derive(Debug, Clone)]
pub struct SliceSpec {
    pub sequence: u32,
    pub series: u32,
    pub image: u32,
    pub description: String,
    pub contrast: Option<String>,
    pub orientation: Option<[f64; 6]>,
    pub z: f64,
    pub pixels: Option<[u16; 4]>,
}

impl SliceSpec {
    pub fn new(sequence: u32, series: u32, image: u32, description: &str) -> Self {
        Self {
            sequence,
            series,
            image,
            description: description.to_string(),
            contrast: None,
            orientation: Some(AXIAL),
            z: image as f64 * 5.0,
            pixels: Some(pixels_for(image)),
        }
    }

    pub fn contrast(mut self, agent: &str) -> Self {
        self.contrast = Some(agent.to_string());
        self
    }

    pub fn orientation(mut self, orientation: Option<[f64; 6]>) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn without_pixels(mut self) -> Self {
        self.pixels = None;
        self
    }
}

/// Stored pixel values of a slice: `image * 10 + index`
pub fn pixels_for(image: u32) -> [u16; 4] {
    let base = (image * 10) as u16;
    [base, base + 1, base + 2, base + 3]
}

fn strs(values: &[String]) -> PrimitiveValue {
    PrimitiveValue::Strs(values.iter().cloned().collect())
}

fn decimals(values: &[f64]) -> PrimitiveValue {
    strs(&values.iter().map(|v| format!("{}", v)).collect::<Vec<_>>())
}

/// Builds the dataset of a slice, including identifying patient tags
pub fn build_object(spec: &SliceSpec) -> InMemDicomObject {
    let sop_instance_uid = format!(
        "1.2.826.0.1.3680043.8.498.{}.{}.{}",
        spec.sequence, spec.series, spec.image
    );

    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(uids::MR_IMAGE_STORAGE),
    ));
    obj.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(sop_instance_uid.as_str()),
    ));
    obj.put(DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("MR")));

    // identifying tags
    obj.put(DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^Jane")));
    obj.put(DataElement::new(tags::PATIENT_ID, VR::LO, PrimitiveValue::from("PID42")));
    obj.put(DataElement::new(tags::PATIENT_BIRTH_DATE, VR::DA, PrimitiveValue::from("19700101")));
    obj.put(DataElement::new(tags::PATIENT_ADDRESS, VR::LO, PrimitiveValue::from("1 Main St")));
    obj.put(DataElement::new(tags::PATIENT_WEIGHT, VR::DS, PrimitiveValue::from("70")));
    obj.put(DataElement::new(tags::REFERRING_PHYSICIAN_NAME, VR::PN, PrimitiveValue::from("House^Greg")));
    obj.put(DataElement::new(tags::STUDY_DATE, VR::DA, PrimitiveValue::from("20230301")));
    obj.put(DataElement::new(tags::STUDY_TIME, VR::TM, PrimitiveValue::from("101500")));
    obj.put(DataElement::new(tags::INSTITUTION_ADDRESS, VR::ST, PrimitiveValue::from("2 Hospital Rd")));
    obj.put(DataElement::new(
        dicom_core::Tag(0x0029, 0x1010),
        VR::OB,
        PrimitiveValue::from(vec![1_u8, 2, 3, 4]),
    ));

    // series tags
    obj.put(DataElement::new(
        tags::SERIES_DESCRIPTION,
        VR::LO,
        PrimitiveValue::from(spec.description.as_str()),
    ));
    if let Some(agent) = &spec.contrast {
        obj.put(DataElement::new(
            tags::CONTRAST_BOLUS_AGENT,
            VR::LO,
            PrimitiveValue::from(agent.as_str()),
        ));
    }
    obj.put(DataElement::new(tags::SLICE_THICKNESS, VR::DS, PrimitiveValue::from("5")));
    obj.put(DataElement::new(tags::SPACING_BETWEEN_SLICES, VR::DS, PrimitiveValue::from("5")));
    obj.put(DataElement::new(
        tags::ACQUISITION_MATRIX,
        VR::US,
        PrimitiveValue::U16([0, 256, 256, 0].as_slice().into()),
    ));
    obj.put(DataElement::new(
        tags::IMAGE_POSITION_PATIENT,
        VR::DS,
        decimals(&[-100.0, -120.0, spec.z]),
    ));
    if let Some(orientation) = spec.orientation {
        obj.put(DataElement::new(
            tags::IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            decimals(&orientation),
        ));
    }

    // image pixel module
    obj.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
    obj.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));
    obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(2_u16)));
    obj.put(DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(2_u16)));
    obj.put(DataElement::new(tags::PIXEL_SPACING, VR::DS, decimals(&[0.5, 0.75])));
    obj.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
    obj.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
    obj.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
    obj.put(DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16)));
    obj.put(DataElement::new(tags::RESCALE_INTERCEPT, VR::DS, PrimitiveValue::from("-1")));
    obj.put(DataElement::new(tags::RESCALE_SLOPE, VR::DS, PrimitiveValue::from("2")));
    if let Some(pixels) = spec.pixels {
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(pixels.as_slice().into()),
        ));
    }

    obj
}

/// Writes a slice as `<prefix>.Seq<S>.Ser<R>.Img<I>.dcm` in `dir`
pub fn write_slice(dir: &Path, prefix: &str, spec: &SliceSpec) -> PathBuf {
    let path = dir.join(format!(
        "{}.Seq{}.Ser{}.Img{}.dcm",
        prefix, spec.sequence, spec.series, spec.image
    ));
    write_slice_to(&path, spec);
    path
}

/// Writes a slice to an arbitrary path
pub fn write_slice_to(path: &Path, spec: &SliceSpec) {
    let obj = build_object(spec);
    let sop_instance_uid = format!(
        "1.2.826.0.1.3680043.8.498.{}.{}.{}",
        spec.sequence, spec.series, spec.image
    );
    let file_obj = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::MR_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(sop_instance_uid),
        )
        .unwrap();
    file_obj.write_to_file(path).unwrap();
}

/// Writes every slice of a series, images `1..=count`
pub fn write_series(
    dir: &Path,
    prefix: &str,
    sequence: u32,
    series: u32,
    count: u32,
    configure: impl Fn(SliceSpec) -> SliceSpec,
) -> Vec<PathBuf> {
    (1..=count)
        .map(|image| {
            let spec = configure(SliceSpec::new(sequence, series, image, ""));
            write_slice(dir, prefix, &spec)
        })
        .collect()
}
