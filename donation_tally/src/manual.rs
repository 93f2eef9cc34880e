/*!

This is the long-form manual for `donation_tally` and the `dondash` dashboard.

## Input formats

The donations are read from a spreadsheet that is edited by the volunteers during
the event. The following formats are supported:
* `xlsx` Excel workbook
* `csv` Comma Separated Values

The format is taken from the `provider` option, or from the extension of the file
when this option is not set.

The whole file is read again at every refresh, while it may be saved by someone else.
This read is best effort: a refresh that happens during a save may see a partial
file and display an error or incomplete totals. The next refresh reads the saved file
and corrects the screen.

### `xlsx`

The first row of the worksheet is the header. By default, the first worksheet of the
workbook is used. Another worksheet can be selected with the `worksheetName` option.

### `csv`

The first record is the header. All the values are read as text, and the amounts must
be plain numbers (`250` or `250.50`, not `$250`).

### Columns

Two columns are required, in any position. Other columns are ignored.

| Donor Name | Donation Amount |
|------------|-----------------|
| Anna       | 100             |
| Bob        | 250.5           |

Every row is a donation, and the rows are expected to be added at the bottom of the
table as the donations come in: the last row is displayed as the latest donation. The
table is not sorted and no timestamp is used.

Rows that are completely blank are skipped. A blank or non-numeric amount is an error:
the dashboard displays the error and tries again at the next refresh. Names are
displayed as they are written, and duplicates are counted as separate donations.

## Configuration

`dondash` comes with the defaults of the event it was written for. They can be changed
with a configuration file in JSON:

```json
{
  "source": { "filePath": "donations.xlsx", "provider": "xlsx" },
  "outputPath": "dashboard.html",
  "targetDonation": 100000,
  "attendeeCount": 350,
  "refreshSeconds": 5,
  "previousDonationsShown": 4,
  "sponsorLogoWidth": 50,
  "sponsorPaths": ["./logos/1", "./logos/2", "./logos/3"],
  "event": {
    "pageTitle": "Annual Benefit Dinner - Donation Dashboard",
    "title": "Annual Benefit Dinner",
    "tagline": "Join us in supporting this noble cause!",
    "date": "Sunday, November 17, 2024",
    "time": "5 PM",
    "location": "Georgetown Community Center"
  },
  "instructions": ["After raising your hand, please fill the card out."],
  "qrCodes": { "tickets": "qr/tickets.png", "donations": "qr/donations.png" },
  "contact": { "email": "info@example.org", "phone": "(512) 555-0100", "website": "example.org" }
}
```

All the keys are optional. The paths, including the QR code images, are relative to
the directory of the configuration file. QR codes may also be given as URLs.

Sponsors: each entry of `sponsorPaths` is a directory. The first image (`png`, `jpg`
or `jpeg`, in alphabetical order) is displayed. A directory with no image is shown
with a warning so that a missing logo can be noticed before the event starts.

 */
