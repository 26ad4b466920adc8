use odk_refdata::PoRecord;

/// Derive the next purchase-order number from the externally maintained PO
/// list: one more than the highest number found, or 1 for an empty list.
/// Rows carry the number in `po_number`, with `doc_id` as the legacy
/// fallback; rows with no parseable number are ignored.
///
/// This is a non-atomic read-then-compute over a shared external list: two
/// submissions racing through it can be assigned the same number. There is
/// no durable store here to host an atomic counter; callers that need
/// uniqueness under concurrency must allocate numbers server-side instead.
pub fn next_po_number(existing: &[PoRecord]) -> u64 {
    existing
        .iter()
        .filter_map(|record| record.po_number.as_deref().or(record.doc_id.as_deref()))
        .filter_map(|raw| raw.trim().parse::<u64>().ok())
        .max()
        .map_or(1, |highest| highest + 1)
}
