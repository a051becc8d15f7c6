mod common;

use std::io::Cursor;
use std::num::NonZeroUsize;

use nspkit::pfs0::Pfs0;
use nspkit::{Container, EntryStream};
use proptest::prelude::*;

use common::{image, write_temp};

fn entry_list() -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    prop::collection::vec(
        ("[a-z0-9]{1,12}\\.(nca|tik|cert|cnmt)", prop::collection::vec(any::<u8>(), 0..600)),
        0..8,
    )
}

proptest! {
    /// Every chunk but the last is full; the last carries the remainder.
    #[test]
    fn chunk_lengths(size in 0usize..20_000, chunk in 1usize..5000) {
        let data = vec![0xA5u8; size];
        let stream = EntryStream::new(
            Cursor::new(data),
            size as u64,
            NonZeroUsize::new(chunk).unwrap(),
        );
        let lens: Vec<usize> = stream.map(|c| c.unwrap().len()).collect();

        prop_assert_eq!(lens.len(), size.div_ceil(chunk));
        if let Some((last, full)) = lens.split_last() {
            prop_assert!(full.iter().all(|&l| l == chunk));
            prop_assert!(*last > 0 && *last <= chunk);
            prop_assert_eq!(*last, size - chunk * (lens.len() - 1));
        }
    }

    /// Decoding a constructed image gives back the same entry list.
    #[test]
    fn header_round_trip(files in entry_list()) {
        let refs: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(n, d)| (n.as_str(), d.as_slice()))
            .collect();
        let img = image(&refs);
        let pfs0 = Pfs0::parse(&mut Cursor::new(&img)).unwrap();

        prop_assert_eq!(pfs0.header_length(), 16 + 24 * files.len() as u64);
        prop_assert_eq!(pfs0.entries.len(), files.len());
        for (entry, (name, data)) in pfs0.entries.iter().zip(&files) {
            prop_assert_eq!(&entry.name, name);
            prop_assert_eq!(entry.size, data.len() as u64);
        }
    }

    /// Streaming any entry with any chunk size reproduces the full read.
    #[test]
    fn stream_refines_full_read(files in entry_list(), chunk in 1usize..1024) {
        let refs: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(n, d)| (n.as_str(), d.as_slice()))
            .collect();
        let file = write_temp(&image(&refs));
        let c = Container::open(file.path()).unwrap();
        let chunk = NonZeroUsize::new(chunk).unwrap();

        for (i, (_, data)) in files.iter().enumerate() {
            let full = c.read_entry_fully(i).unwrap();
            let streamed: Vec<u8> = c
                .open_entry_stream_with(i, chunk)
                .unwrap()
                .flat_map(|c| c.unwrap().into_data())
                .collect();
            prop_assert_eq!(&full, data);
            prop_assert_eq!(streamed, full);
        }
    }
}
