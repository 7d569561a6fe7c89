pub(crate) mod jsonl;
