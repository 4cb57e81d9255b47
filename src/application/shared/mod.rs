pub mod trace_enrichment;
